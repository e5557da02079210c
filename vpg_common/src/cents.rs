use std::fmt::Display;

use serde::{Deserialize, Serialize};

//--------------------------------------       Cents        ----------------------------------------------------------
/// A monetary amount in minor units, as reported by the payment processor.
///
/// Stripe reports `amount` and `amount_refunded` in the smallest currency denomination (cents for USD). The payment
/// records themselves store amounts in major units, so the only arithmetic this type ever needs is the division by
/// 100 in [`Cents::to_major`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Converts the minor-unit amount to major units. 9999 cents become 99.99.
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.to_major())
    }
}

#[cfg(test)]
mod test {
    use super::Cents;

    #[test]
    fn converts_to_major_units() {
        assert_eq!(Cents::new(9999).to_major(), 99.99);
        assert_eq!(Cents::new(5000).to_major(), 50.0);
        assert_eq!(Cents::new(0).to_major(), 0.0);
    }

    #[test]
    fn displays_as_major_units() {
        assert_eq!(Cents::new(9999).to_string(), "99.99");
        assert_eq!(Cents::new(100).to_string(), "1.00");
    }

    #[test]
    fn deserializes_from_a_bare_number() {
        let cents: Cents = serde_json::from_str("9999").unwrap();
        assert_eq!(cents, Cents::new(9999));
    }
}
