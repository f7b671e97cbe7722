/// Record kinds of the format, as given by the digit that follows the 'S'
/// marker at the start of each line. Only the three data kinds carry an
/// address plus payload that ends up in a memory image; every other kind is
/// recognized but skipped by the decoder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordKind {
    /// 'S0': header record with vendor-specific information.
    Header,

    /// 'S1': data record with a 16-bit address.
    Data16,

    /// 'S2': data record with a 24-bit address.
    Data24,

    /// 'S3': data record with a 32-bit address.
    Data32,

    /// 'S5': 16-bit count of the data records transmitted so far.
    Count16,

    /// 'S6': 24-bit count of the data records transmitted so far.
    Count24,

    /// 'S7': 32-bit execution start address.
    Start32,

    /// 'S8': 24-bit execution start address.
    Start24,

    /// 'S9': 16-bit execution start address.
    Start16,
}

impl RecordKind {
    /// Returns the kind identified by the given type `digit`, or None if the
    /// digit does not belong to the recognized set. Note that '4' is reserved
    /// by the format and treated as unrecognized.
    pub fn from_digit(digit: char) -> Option<RecordKind> {
        match digit {
            '0' => Some(RecordKind::Header),
            '1' => Some(RecordKind::Data16),
            '2' => Some(RecordKind::Data24),
            '3' => Some(RecordKind::Data32),
            '5' => Some(RecordKind::Count16),
            '6' => Some(RecordKind::Count24),
            '7' => Some(RecordKind::Start32),
            '8' => Some(RecordKind::Start24),
            '9' => Some(RecordKind::Start16),
            _ => None,
        }
    }

    /// Width in hex characters of the address field for the kinds that carry
    /// addressed data, or None for every other kind.
    pub fn data_address_width(self) -> Option<usize> {
        match self {
            RecordKind::Data16 => Some(4),
            RecordKind::Data24 => Some(6),
            RecordKind::Data32 => Some(8),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_digit_test() {
        assert_eq!(RecordKind::from_digit('0'), Some(RecordKind::Header));
        assert_eq!(RecordKind::from_digit('1'), Some(RecordKind::Data16));
        assert_eq!(RecordKind::from_digit('2'), Some(RecordKind::Data24));
        assert_eq!(RecordKind::from_digit('3'), Some(RecordKind::Data32));
        assert_eq!(RecordKind::from_digit('5'), Some(RecordKind::Count16));
        assert_eq!(RecordKind::from_digit('6'), Some(RecordKind::Count24));
        assert_eq!(RecordKind::from_digit('7'), Some(RecordKind::Start32));
        assert_eq!(RecordKind::from_digit('8'), Some(RecordKind::Start24));
        assert_eq!(RecordKind::from_digit('9'), Some(RecordKind::Start16));

        // '4' is reserved, and anything else is plain garbage.
        assert_eq!(RecordKind::from_digit('4'), None);
        assert_eq!(RecordKind::from_digit('A'), None);
        assert_eq!(RecordKind::from_digit('s'), None);
    }

    #[test]
    fn address_widths() {
        assert_eq!(RecordKind::Data16.data_address_width(), Some(4));
        assert_eq!(RecordKind::Data24.data_address_width(), Some(6));
        assert_eq!(RecordKind::Data32.data_address_width(), Some(8));

        assert_eq!(RecordKind::Header.data_address_width(), None);
        assert_eq!(RecordKind::Count16.data_address_width(), None);
        assert_eq!(RecordKind::Start16.data_address_width(), None);
    }
}
