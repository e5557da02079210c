//! Small, pure helpers shared by the storage layer.

/// Derives the redemption code for a voucher: the uppercased payment channel, a hyphen, and the last 8 characters of
/// the payment intent id, uppercased. `("card", "pi_3MtwBwLkdIwHu7ix28a3tqPa")` becomes `CARD-28A3TQPA`.
pub fn voucher_code(channel: &str, txid: &str) -> String {
    let chars = txid.chars().collect::<Vec<_>>();
    let start = chars.len().saturating_sub(8);
    let tail = chars[start..].iter().collect::<String>();
    format!("{}-{}", channel.to_uppercase(), tail.to_uppercase())
}

#[cfg(test)]
mod test {
    use super::voucher_code;

    #[test]
    fn derives_code_from_channel_and_txid_tail() {
        assert_eq!(voucher_code("card", "pi_3MtwBwLkdIwHu7ix28a3tqPa"), "CARD-28A3TQPA");
        assert_eq!(voucher_code("oxxo", "pi_3MtwBwLkdIwHu7ix28a3tqPa"), "OXXO-28A3TQPA");
    }

    #[test]
    fn short_txids_use_the_whole_id() {
        assert_eq!(voucher_code("card", "pi_42"), "CARD-PI_42");
    }
}
