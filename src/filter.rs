//! The stream filters a document writer can name, and the codec behind each.
//!
//! Only the LZW encoder has an algorithm here. Every other direction reports
//! `LzwError::NotImplemented` so that a stream is never silently written unfiltered. The Flate,
//! hex and ASCII85 filters are named so callers can route them to their own codecs.
use crate::alloc::{string::ToString, vec::Vec};
use crate::error::LzwError;

/// A stream filter, named as in ISO 32000-1 section 7.4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Filter {
    Lzw,
    Flate,
    AsciiHex,
    Ascii85,
    RunLength,
    CcittFax,
    Jbig2,
    Dct,
    Jpx,
    Crypt,
}

impl Filter {
    pub const ALL: [Filter; 10] = [
        Filter::Lzw,
        Filter::Flate,
        Filter::AsciiHex,
        Filter::Ascii85,
        Filter::RunLength,
        Filter::CcittFax,
        Filter::Jbig2,
        Filter::Dct,
        Filter::Jpx,
        Filter::Crypt,
    ];

    /// Look up a filter by its name, with or without the leading slash.
    pub fn from_name(name: &str) -> Result<Self, LzwError> {
        let bare = name.strip_prefix('/').unwrap_or(name);
        Filter::ALL
            .iter()
            .copied()
            .find(|filter| filter.name() == bare)
            .ok_or_else(|| LzwError::UnknownFilter(name.to_string()))
    }

    /// The name of the filter in a stream dictionary.
    pub fn name(self) -> &'static str {
        match self {
            Filter::Lzw => "LZWDecode",
            Filter::Flate => "FlateDecode",
            Filter::AsciiHex => "ASCIIHexDecode",
            Filter::Ascii85 => "ASCII85Decode",
            Filter::RunLength => "RunLengthDecode",
            Filter::CcittFax => "CCITTFaxDecode",
            Filter::Jbig2 => "JBIG2Decode",
            Filter::Dct => "DCTDecode",
            Filter::Jpx => "JPXDecode",
            Filter::Crypt => "Crypt",
        }
    }

    pub fn encode(self, data: &[u8]) -> Result<Vec<u8>, LzwError> {
        match self {
            Filter::Lzw => Ok(crate::encode::encode(data)),
            other => Err(LzwError::NotImplemented(other.name())),
        }
    }

    pub fn decode(self, data: &[u8]) -> Result<Vec<u8>, LzwError> {
        match self {
            Filter::Lzw => crate::decode::decode(data),
            other => Err(LzwError::NotImplemented(other.name())),
        }
    }
}

impl core::str::FromStr for Filter {
    type Err = LzwError;

    fn from_str(name: &str) -> Result<Self, LzwError> {
        Filter::from_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::Filter;
    use crate::LzwError;

    #[test]
    fn names_roundtrip() {
        for &filter in Filter::ALL.iter() {
            assert_eq!(Filter::from_name(filter.name()), Ok(filter));
        }
        assert_eq!("/LZWDecode".parse::<Filter>(), Ok(Filter::Lzw));
        assert_eq!("/DCTDecode".parse::<Filter>(), Ok(Filter::Dct));
        assert_eq!("/FlateDecode".parse::<Filter>(), Ok(Filter::Flate));
        assert_eq!("ASCIIHexDecode".parse::<Filter>(), Ok(Filter::AsciiHex));
        assert_eq!("/ASCII85Decode".parse::<Filter>(), Ok(Filter::Ascii85));
    }

    #[test]
    fn unknown_name() {
        assert_eq!(
            Filter::from_name("/Zstd"),
            Err(LzwError::UnknownFilter("/Zstd".into()))
        );
        assert!(Filter::from_name("lzwdecode").is_err());
    }

    #[test]
    fn only_lzw_encodes() {
        let data = [45, 45, 45, 45, 45, 65, 45, 45, 45, 66];
        assert_eq!(Filter::Lzw.encode(&data), Ok(crate::encode(&data)));
        assert!(Filter::Lzw.decode(&data).is_err());

        for &filter in Filter::ALL[1..].iter() {
            assert_eq!(
                filter.encode(&data),
                Err(LzwError::NotImplemented(filter.name()))
            );
            assert_eq!(
                filter.decode(&data),
                Err(LzwError::NotImplemented(filter.name()))
            );
        }
    }
}
