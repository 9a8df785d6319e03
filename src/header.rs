//! 从首个本地文件头提取快速校验所需的数据。
//! 解析失败一律返回 None，引擎退回逐候选完整试解的慢速路径。

use clap::ValueEnum;

use crate::zipcrypto::{ZipCryptoVerifier, ENC_HEADER_LEN};

/// 本地文件头固定部分长度
const LOCAL_HEADER_LEN: usize = 30;

const FLAG_ENCRYPTED: u16 = 0x0001;
const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;
const FLAG_STRONG_ENCRYPTION: u16 = 0x0040;

/// AES 加密条目的压缩方法号 (WinZip AE，bit 6 通常不置位)
const METHOD_AES: u16 = 99;

/// 校验字节来源
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckByte {
    /// 按通用标志位 bit 3 选择：带数据描述符用修改时间高字节，否则用 CRC 高字节
    Auto,
    /// 强制使用修改时间高字节
    ModTime,
    /// 强制使用本地头 CRC 高字节 (bit 3 置位时本地头 CRC 为零，禁用快速路径)
    Crc32,
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// 解析首个本地文件头，构造 ZipCrypto 快速校验器
///
/// AES、未加密或格式异常返回 None
pub fn build_verifier(data: &[u8], check_byte: CheckByte) -> Option<ZipCryptoVerifier> {
    if data.len() < LOCAL_HEADER_LEN {
        return None;
    }
    if data[0] != b'P' || data[1] != b'K' {
        return None;
    }

    let flags = read_u16(data, 6);
    if flags & FLAG_ENCRYPTED == 0 || flags & FLAG_STRONG_ENCRYPTION != 0 {
        return None;
    }
    if read_u16(data, 8) == METHOD_AES {
        return None;
    }

    let streamed = flags & FLAG_DATA_DESCRIPTOR != 0;
    let mod_time = read_u16(data, 10);
    let crc32 = read_u32(data, 14);
    let fname_len = read_u16(data, 26) as usize;
    let extra_len = read_u16(data, 28) as usize;

    let header_start = LOCAL_HEADER_LEN + fname_len + extra_len;
    if data.len() < header_start + ENC_HEADER_LEN {
        return None;
    }

    let expected = match check_byte {
        CheckByte::ModTime => (mod_time >> 8) as u8,
        CheckByte::Crc32 if streamed => return None,
        CheckByte::Crc32 => (crc32 >> 24) as u8,
        CheckByte::Auto if streamed => (mod_time >> 8) as u8,
        CheckByte::Auto => (crc32 >> 24) as u8,
    };

    let mut enc_header = [0u8; ENC_HEADER_LEN];
    enc_header.copy_from_slice(&data[header_start..header_start + ENC_HEADER_LEN]);
    Some(ZipCryptoVerifier::new(enc_header, expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENC: [u8; ENC_HEADER_LEN] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

    fn local_header(flags: u16, method: u16, mod_time: u16, crc32: u32) -> Vec<u8> {
        let fname = b"secret.txt";
        let mut data = Vec::new();
        data.extend_from_slice(&[0x50, 0x4b, 0x03, 0x04]);
        data.extend_from_slice(&20u16.to_le_bytes()); // version needed
        data.extend_from_slice(&flags.to_le_bytes());
        data.extend_from_slice(&method.to_le_bytes());
        data.extend_from_slice(&mod_time.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes()); // mod date
        data.extend_from_slice(&crc32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes()); // compressed size
        data.extend_from_slice(&0u32.to_le_bytes()); // uncompressed size
        data.extend_from_slice(&(fname.len() as u16).to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes()); // extra length
        data.extend_from_slice(fname);
        data.extend_from_slice(&ENC);
        data
    }

    #[test]
    fn test_rejects_short_input() {
        assert!(build_verifier(&[0x50, 0x4b], CheckByte::Auto).is_none());
    }

    #[test]
    fn test_rejects_bad_signature() {
        let mut data = local_header(0x0001, 0, 0, 0);
        data[0] = b'Q';
        assert!(build_verifier(&data, CheckByte::Auto).is_none());
    }

    #[test]
    fn test_rejects_unencrypted_entry() {
        let data = local_header(0x0000, 0, 0, 0);
        assert!(build_verifier(&data, CheckByte::Auto).is_none());
    }

    #[test]
    fn test_rejects_strong_encryption() {
        let data = local_header(FLAG_ENCRYPTED | FLAG_STRONG_ENCRYPTION, 0, 0, 0);
        assert!(build_verifier(&data, CheckByte::Auto).is_none());
    }

    #[test]
    fn test_rejects_aes_method() {
        let data = local_header(FLAG_ENCRYPTED, METHOD_AES, 0, 0);
        assert!(build_verifier(&data, CheckByte::Auto).is_none());
    }

    #[test]
    fn test_rejects_truncated_encryption_header() {
        let mut data = local_header(FLAG_ENCRYPTED, 0, 0, 0);
        data.truncate(data.len() - 1);
        assert!(build_verifier(&data, CheckByte::Auto).is_none());
    }

    #[test]
    fn test_auto_uses_crc_without_data_descriptor() {
        let data = local_header(FLAG_ENCRYPTED, 8, 0xAB12, 0xCD00_0000);
        let verifier = build_verifier(&data, CheckByte::Auto).unwrap();
        assert_eq!(verifier.expected(), 0xCD);
    }

    #[test]
    fn test_auto_uses_mod_time_with_data_descriptor() {
        let data = local_header(FLAG_ENCRYPTED | FLAG_DATA_DESCRIPTOR, 8, 0xAB12, 0);
        let verifier = build_verifier(&data, CheckByte::Auto).unwrap();
        assert_eq!(verifier.expected(), 0xAB);
    }

    #[test]
    fn test_forced_mod_time() {
        let data = local_header(FLAG_ENCRYPTED, 8, 0xAB12, 0xCD00_0000);
        let verifier = build_verifier(&data, CheckByte::ModTime).unwrap();
        assert_eq!(verifier.expected(), 0xAB);
    }

    #[test]
    fn test_forced_crc_with_data_descriptor_disables_fast_path() {
        let data = local_header(FLAG_ENCRYPTED | FLAG_DATA_DESCRIPTOR, 8, 0xAB12, 0);
        assert!(build_verifier(&data, CheckByte::Crc32).is_none());
    }
}
