use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// 解压 gzip 数据
pub fn decompress_gzip(data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
    let mut decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(decompressed)
}

/// 压缩数据为 gzip 格式
pub fn compress_gzip(data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// 判断数据是否为 gzip 格式（魔数 0x1f 0x8b）
pub fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gzip_roundtrip() {
        let payload = br#"{"event":"receive_message","data":{"text":"hello"}}"#;
        let compressed = compress_gzip(payload).unwrap();
        assert!(is_gzip(&compressed));
        let restored = decompress_gzip(&compressed).unwrap();
        assert_eq!(restored, payload);
    }

    #[test]
    fn plain_json_is_not_gzip() {
        assert!(!is_gzip(b"{}"));
        assert!(!is_gzip(b""));
    }
}
