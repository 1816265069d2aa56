// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! TOTP Code Generator
//!
//! RFC 6238 codes from `otpauth://totp/...` URLs as stored in `oneTimeCode`
//! fields. Supported query parameters: `secret` (base32, required),
//! `algorithm` (SHA1, SHA256, SHA512; default SHA1), `digits` (default 6)
//! and `period` in seconds (default 30).

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use url::Url;

use crate::domain::client::{ClientError, TotpCode, TotpGenerator};

const BASE32_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Algorithm {
    Sha1,
    Sha256,
    Sha512,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TotpParameters {
    secret: Vec<u8>,
    algorithm: Algorithm,
    digits: u32,
    period: u64,
}

fn totp_error(message: impl Into<String>) -> ClientError {
    ClientError::Totp(message.into())
}

/// Unpadded or padded RFC 4648 base32; whitespace and case are ignored.
fn decode_base32(input: &str) -> Result<Vec<u8>, ClientError> {
    let mut output = Vec::with_capacity(input.len() * 5 / 8);
    let mut buffer: u64 = 0;
    let mut bits = 0u32;
    for c in input.chars().filter(|c| !c.is_whitespace() && *c != '=') {
        let c = c.to_ascii_uppercase() as u8;
        let value = BASE32_ALPHABET
            .iter()
            .position(|&a| a == c)
            .ok_or_else(|| totp_error(format!("invalid base32 character '{}'", c as char)))?;
        buffer = (buffer << 5) | value as u64;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            output.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }
    Ok(output)
}

fn parse_url(totp_url: &str) -> Result<TotpParameters, ClientError> {
    let url = Url::parse(totp_url.trim()).map_err(|e| totp_error(format!("invalid URL: {}", e)))?;
    if url.scheme() != "otpauth" {
        return Err(totp_error(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str() != Some("totp") {
        return Err(totp_error("only otpauth://totp/ URLs are supported"));
    }

    let mut parameters = TotpParameters {
        secret: Vec::new(),
        algorithm: Algorithm::Sha1,
        digits: 6,
        period: 30,
    };
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "secret" => parameters.secret = decode_base32(&value)?,
            "algorithm" => {
                parameters.algorithm = match value.to_ascii_uppercase().as_str() {
                    "SHA1" => Algorithm::Sha1,
                    "SHA256" => Algorithm::Sha256,
                    "SHA512" => Algorithm::Sha512,
                    other => return Err(totp_error(format!("unsupported algorithm '{}'", other))),
                }
            }
            "digits" => {
                parameters.digits = value
                    .parse::<u32>()
                    .ok()
                    .filter(|d| (1..=10).contains(d))
                    .ok_or_else(|| totp_error(format!("invalid digits '{}'", value)))?
            }
            "period" => {
                parameters.period = value
                    .parse::<u64>()
                    .ok()
                    .filter(|p| *p > 0)
                    .ok_or_else(|| totp_error(format!("invalid period '{}'", value)))?
            }
            _ => {}
        }
    }
    if parameters.secret.is_empty() {
        return Err(totp_error("missing secret"));
    }
    Ok(parameters)
}

fn hmac_digest(algorithm: Algorithm, key: &[u8], message: &[u8]) -> Result<Vec<u8>, ClientError> {
    let invalid_key = |e: hmac::digest::InvalidLength| totp_error(e.to_string());
    Ok(match algorithm {
        Algorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key).map_err(invalid_key)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key).map_err(invalid_key)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key).map_err(invalid_key)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OtpAuthTotpGenerator;

impl OtpAuthTotpGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Code for `totp_url` at `unix_seconds`
    pub fn generate_at(&self, totp_url: &str, unix_seconds: u64) -> Result<TotpCode, ClientError> {
        let parameters = parse_url(totp_url)?;
        let counter = unix_seconds / parameters.period;
        let digest = hmac_digest(
            parameters.algorithm,
            &parameters.secret,
            &counter.to_be_bytes(),
        )?;

        let offset = (digest[digest.len() - 1] & 0x0f) as usize;
        let binary = u32::from_be_bytes([
            digest[offset] & 0x7f,
            digest[offset + 1],
            digest[offset + 2],
            digest[offset + 3],
        ]);
        let code = u64::from(binary) % 10u64.pow(parameters.digits);

        Ok(TotpCode {
            code: format!("{:0width$}", code, width = parameters.digits as usize),
            seconds_remaining: parameters.period - unix_seconds % parameters.period,
        })
    }
}

impl TotpGenerator for OtpAuthTotpGenerator {
    fn generate(&self, totp_url: &str) -> Result<TotpCode, ClientError> {
        let now = Utc::now().timestamp().max(0) as u64;
        self.generate_at(totp_url, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 6238 appendix B seeds
    const SHA1_URL: &str =
        "otpauth://totp/ACME:john?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ&digits=8";
    const SHA256_URL: &str = "otpauth://totp/x?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZA&algorithm=SHA256&digits=8";

    #[test]
    fn test_rfc6238_sha1() {
        let generator = OtpAuthTotpGenerator::new();
        let code = generator.generate_at(SHA1_URL, 59).unwrap();
        assert_eq!(code.code, "94287082");
        assert_eq!(code.seconds_remaining, 1);

        let code = generator.generate_at(SHA1_URL, 1_111_111_109).unwrap();
        assert_eq!(code.code, "07081804");
    }

    #[test]
    fn test_rfc6238_sha256() {
        let code = OtpAuthTotpGenerator::new().generate_at(SHA256_URL, 59).unwrap();
        assert_eq!(code.code, "46119246");
    }

    #[test]
    fn test_default_digits_and_period() {
        let code = OtpAuthTotpGenerator::new()
            .generate_at("otpauth://totp/x?secret=JBSWY3DPEHPK3PXP", 30)
            .unwrap();
        assert_eq!(code.code.len(), 6);
        assert_eq!(code.seconds_remaining, 30);
    }

    #[test]
    fn test_invalid_urls() {
        let generator = OtpAuthTotpGenerator::new();
        assert!(generator.generate("https://example.com").is_err());
        assert!(generator.generate("otpauth://hotp/x?secret=JBSWY3DPEHPK3PXP").is_err());
        assert!(generator.generate("otpauth://totp/x").is_err());
        assert!(generator.generate("otpauth://totp/x?secret=1111").is_err());
    }

    #[test]
    fn test_base32() {
        assert_eq!(decode_base32("JBSWY3DP").unwrap(), b"Hello");
        assert_eq!(decode_base32("jbsw y3dp").unwrap(), b"Hello");
    }
}
