use std::path::Path;

use crate::common::error::{Error, Result};

/// Number of entries per color plane.
pub const LUT_ENTRIES: usize = 256;
/// On-disk size of a palette file: three consecutive 256-byte planes (R, G, B).
pub const LUT_FILE_SIZE: usize = LUT_ENTRIES * 3;

/// A pseudocolor lookup table mapping an 8-bit intensity to an RGB triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lut {
    r: [u8; LUT_ENTRIES],
    g: [u8; LUT_ENTRIES],
    b: [u8; LUT_ENTRIES],
}

impl Lut {
    /// Parses the 768-byte plane layout: 256 red values, then 256 green,
    /// then 256 blue.
    pub fn from_bytes(bytes: &[u8]) -> Result<Lut> {
        if bytes.len() != LUT_FILE_SIZE {
            return Err(Error::MalformedLut(format!(
                "palette must be exactly {} bytes, got {}",
                LUT_FILE_SIZE,
                bytes.len()
            )));
        }

        let mut lut = Lut {
            r: [0; LUT_ENTRIES],
            g: [0; LUT_ENTRIES],
            b: [0; LUT_ENTRIES],
        };
        lut.r.copy_from_slice(&bytes[..LUT_ENTRIES]);
        lut.g.copy_from_slice(&bytes[LUT_ENTRIES..2 * LUT_ENTRIES]);
        lut.b.copy_from_slice(&bytes[2 * LUT_ENTRIES..]);

        Ok(lut)
    }

    pub fn from_planes(r: [u8; LUT_ENTRIES], g: [u8; LUT_ENTRIES], b: [u8; LUT_ENTRIES]) -> Lut {
        Lut { r, g, b }
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Lut> {
        let bytes = std::fs::read(path)?;
        Lut::from_bytes(&bytes)
    }

    /// Identity ramp: every intensity maps to the gray of the same value.
    pub fn grayscale() -> Lut {
        let mut ramp = [0u8; LUT_ENTRIES];
        for (i, v) in ramp.iter_mut().enumerate() {
            *v = i as u8;
        }
        Lut {
            r: ramp,
            g: ramp,
            b: ramp,
        }
    }

    /// Hot-iron pseudocolor ramp: black through red and yellow to white.
    pub fn hot_iron() -> Lut {
        let mut r = [0u8; LUT_ENTRIES];
        let mut g = [0u8; LUT_ENTRIES];
        let mut b = [0u8; LUT_ENTRIES];
        for i in 0..LUT_ENTRIES {
            let v = i as i32 * 3;
            r[i] = v.min(255) as u8;
            g[i] = (v - 255).clamp(0, 255) as u8;
            b[i] = (v - 510).clamp(0, 255) as u8;
        }
        Lut { r, g, b }
    }

    /// RGB triple for an 8-bit intensity.
    pub fn rgb(&self, index: u8) -> [u8; 3] {
        let i = index as usize;
        [self.r[i], self.g[i], self.b[i]]
    }
}

impl Default for Lut {
    fn default() -> Self {
        Lut::grayscale()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn from_bytes_splits_planes() {
        let mut bytes = vec![0u8; LUT_FILE_SIZE];
        bytes[10] = 11; // red plane
        bytes[256 + 10] = 22; // green plane
        bytes[512 + 10] = 33; // blue plane

        let lut = Lut::from_bytes(&bytes).unwrap();
        assert_eq!(lut.rgb(10), [11, 22, 33]);
        assert_eq!(lut.rgb(0), [0, 0, 0]);
    }

    #[test]
    fn from_bytes_rejects_wrong_size() {
        assert!(matches!(
            Lut::from_bytes(&[0u8; 767]),
            Err(Error::MalformedLut(_))
        ));
        assert!(matches!(
            Lut::from_bytes(&[0u8; 769]),
            Err(Error::MalformedLut(_))
        ));
    }

    #[test]
    fn grayscale_is_identity() {
        let lut = Lut::grayscale();
        assert_eq!(lut.rgb(0), [0, 0, 0]);
        assert_eq!(lut.rgb(128), [128, 128, 128]);
        assert_eq!(lut.rgb(255), [255, 255, 255]);
    }

    #[test]
    fn hot_iron_endpoints() {
        let lut = Lut::hot_iron();
        assert_eq!(lut.rgb(0), [0, 0, 0]);
        assert_eq!(lut.rgb(255), [255, 255, 255]);
        // Mid-ramp is fully red before green starts.
        assert_eq!(lut.rgb(85), [255, 0, 0]);
    }

    #[test]
    fn read_file_round_trip() {
        let mut bytes = vec![0u8; LUT_FILE_SIZE];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();

        let lut = Lut::read_file(file.path()).unwrap();
        assert_eq!(lut, Lut::from_bytes(&bytes).unwrap());
    }

    #[test]
    fn read_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Lut::read_file(dir.path().join("missing.pal"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
