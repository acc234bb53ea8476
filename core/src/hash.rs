// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Hash related utils.

use crate::Error;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use md5::{Digest, Md5};

/// Base64 encode
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

/// Standard alphabet, padding optional.
const BASE64_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Base64 decode
///
/// Accepts what gateways actually send: missing padding, line wrapped
/// (MIME) input and the URL safe `-` / `_` characters.
pub fn base64_decode(content: &str) -> crate::Result<Vec<u8>> {
    let normalized: String = content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    BASE64_LENIENT
        .decode(normalized)
        .map_err(|e| Error::payload_invalid("base64 decode failed").with_source(e))
}

/// Base64 encoded MD5 hash.
///
/// This is the digest the SOA gateway signs instead of the raw message.
pub fn base64_md5(content: &[u8]) -> String {
    base64_encode(Md5::digest(content).as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_base64_md5() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(base64_md5(b""), "1B2M2Y8AsgTpgAmY7PhCfg==");
    }

    #[test_case("eyJhIjoiYmMifQ=="; "padded")]
    #[test_case("eyJhIjoiYmMifQ"; "unpadded")]
    #[test_case("eyJhIjoi\r\nYmMifQ=="; "line wrapped")]
    #[test_case(" eyJhIjoiYmMifQ==\n"; "surrounding whitespace")]
    fn test_base64_decode_lenient(input: &str) {
        assert_eq!(base64_decode(input).unwrap(), br#"{"a":"bc"}"#);
    }

    #[test]
    fn test_base64_decode_url_safe() {
        // 0xfb 0xff encodes to "+/8=" in the standard alphabet.
        assert_eq!(base64_decode("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn test_base64_decode_invalid() {
        let err = base64_decode("not base64!").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::PayloadInvalid);
    }
}
