use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use log::{debug, warn};

/// Turns raw file bytes into text.
pub trait TextDecoder {
    fn decode(&self, bytes: &[u8]) -> String;
}

/// Decodes by BOM when present, otherwise by a `chardetng` guess.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetectingDecoder;

impl TextDecoder for DetectingDecoder {
    fn decode(&self, bytes: &[u8]) -> String {
        if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
            debug!("Decoding {} text from its BOM", encoding.name());
            let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
            if had_errors {
                warn!("Malformed {} sequences were replaced", encoding.name());
            }
            return text.into_owned();
        }

        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        let encoding = detector.guess(None, true);

        debug!("Detected text encoding: {}", encoding.name());

        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            warn!("Malformed {} sequences were replaced", encoding.name());
        }

        text.into_owned()
    }
}
