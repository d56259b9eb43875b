use std::convert::TryFrom;

/// Enumeration of different page types in the storage system.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    /// Slotted data page holding variable-length records.
    Data = 1,
    /// Directory page describing the data pages of a heap file.
    Directory = 2,
}

impl From<PageType> for u16 {
    /// Converts a `PageType` enum variant to its corresponding `u16` value.
    fn from(p: PageType) -> Self {
        p as u16
    }
}

impl TryFrom<u16> for PageType {
    type Error = ();

    /// Attempts to convert a `u16` value to its corresponding `PageType` enum variant.
    fn try_from(v: u16) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(PageType::Data),
            2 => Ok(PageType::Directory),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_from_u16() {
        assert_eq!(u16::from(PageType::Data), 1);
        assert_eq!(u16::from(PageType::Directory), 2);

        assert_eq!(PageType::try_from(1).unwrap(), PageType::Data);
        assert_eq!(PageType::try_from(2).unwrap(), PageType::Directory);

        assert!(PageType::try_from(99).is_err());
    }
}
