use crate::{errors::AdmissionError, types::{Message, MESSAGE_FLAG_MASK}};

/// The three accepted low-bit patterns. Each sets a distinct bit group, so at most one
/// can match a given message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageFlag {
    /// `0b100000`
    Top,
    /// `0b011000`
    Middle,
    /// `0b000100`
    Low,
}

impl MessageFlag {
    pub const ALL: [Self; 3] = [Self::Top, Self::Middle, Self::Low];

    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Top => 0b10_0000,
            Self::Middle => 0b01_1000,
            Self::Low => 0b00_0100,
        }
    }

    /// Select the flag matching the low six bits exactly.
    #[must_use]
    pub const fn select(low_bits: u32) -> Option<Self> {
        match low_bits {
            0b10_0000 => Some(Self::Top),
            0b01_1000 => Some(Self::Middle),
            0b00_0100 => Some(Self::Low),
            _ => None,
        }
    }
}

/// Low six bits of the message's 32-bit word.
#[must_use]
pub const fn low_bits(message: &Message) -> u32 {
    message.low_word() & MESSAGE_FLAG_MASK
}

/// Admission predicate over message content.
///
/// # Errors
///
/// Returns `AdmissionError::ValidityRejected` when no flag matches.
pub fn classify(message: &Message) -> Result<MessageFlag, AdmissionError> {
    let low_bits = low_bits(message);
    MessageFlag::select(low_bits).ok_or(AdmissionError::ValidityRejected { low_bits })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_three_of_sixty_four_patterns_accepted() {
        let accepted: Vec<u32> = (0u32..64).filter(|b| MessageFlag::select(*b).is_some()).collect();
        assert_eq!(accepted, vec![0b00_0100, 0b01_1000, 0b10_0000]);
    }

    #[test]
    fn flags_are_pairwise_disjoint() {
        for (i, a) in MessageFlag::ALL.iter().enumerate() {
            assert_eq!(MessageFlag::select(a.bits()), Some(*a));
            for b in &MessageFlag::ALL[i + 1..] {
                assert_eq!(a.bits() & b.bits(), 0);
            }
        }
    }

    #[test]
    fn higher_bits_are_ignored() {
        let m = Message::from(0b0001_1101_0101_0110_0000u64);
        assert_eq!(classify(&m), Ok(MessageFlag::Top));
        let m = Message::from((u128::MAX << 6) | 0b01_1000);
        assert_eq!(classify(&m), Ok(MessageFlag::Middle));
    }

    #[test]
    fn combined_or_empty_patterns_rejected() {
        for bits in [0b00_0000u64, 0b11_1111, 0b10_0100, 0b11_1000, 0b00_1000, 0b01_0000] {
            assert_eq!(
                classify(&Message::from(bits)),
                Err(AdmissionError::ValidityRejected { low_bits: u32::try_from(bits).unwrap() })
            );
        }
    }

    #[test]
    fn sample_with_clear_low_bits_rejected() {
        // 0b000111010101000000 has low bits 0b000000.
        assert!(classify(&Message::from(0b0001_1101_0101_0000_00u64)).is_err());
    }
}
