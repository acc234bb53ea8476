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

//! Utility functions and types.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// Redacts a string by replacing all but the first and last three characters with asterisks.
///
/// - If the input string has fewer than 12 characters, it should be entirely redacted.
/// - If the input string has 12 or more characters, only the first three and the last three.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> Debug for Redact<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.chars().count();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 {
            f.write_str("***")
        } else {
            let head: String = self.0.chars().take(3).collect();
            let tail: String = self.0.chars().skip(length - 3).collect();
            f.write_str(&head)?;
            f.write_str("***")?;
            f.write_str(&tail)
        }
    }
}

/// Characters left unescaped in query strings, mirroring `encodeURIComponent`.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode pairs into `k1=v1&k2=v2`, keeping their order.
///
/// Spaces become `%20`, never `+`.
pub fn encode_query<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut s = String::new();
    for (i, (k, v)) in pairs.into_iter().enumerate() {
        if i > 0 {
            s.push('&');
        }
        s.extend(utf8_percent_encode(k, QUERY_ENCODE_SET));
        s.push('=');
        s.extend(utf8_percent_encode(v, QUERY_ENCODE_SET));
    }
    s
}

/// Render a JSON value the way it appears in signed strings and form bodies.
///
/// Strings are taken verbatim, everything else uses its compact JSON text.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        v => v.to_string(),
    }
}

/// Split a key into words.
///
/// Words break on any non alphanumeric character, on a lower to upper case
/// change, before the last capital of an acronym followed by a lowercase
/// letter (`XMLHttp` is `XML` + `Http`), and between letters and digits.
fn split_words(key: &str) -> Vec<String> {
    let chars: Vec<char> = key.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_uppercase() && c.is_uppercase() && next_is_lower)
                || (prev.is_numeric() != c.is_numeric());
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Convert `snake_case`, `kebab-case`, `PascalCase` or mixed keys into
/// `camelCase`, splitting words like lodash's `camelCase`.
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, word) in split_words(key).iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Recursively convert every object key in `value` into camelCase.
pub fn camel_case_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (to_camel_case(&k), camel_case_keys(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(list) => Value::Array(list.into_iter().map(camel_case_keys).collect()),
        v => v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_redact() {
        let cases = vec![
            ("Short", "***"),
            ("Hello World!", "Hel***ld!"),
            ("This is a longer string", "Thi***ing"),
            ("", "EMPTY"),
            ("HelloWorld", "***"),
        ];

        for (input, expected) in cases {
            assert_eq!(
                format!("{:?}", Redact(input)),
                expected,
                "Failed on input: {}",
                input
            );
        }
    }

    #[test]
    fn test_encode_query() {
        let query = encode_query([
            ("timestamp", "2024-05-20 10:30:00"),
            ("req", r#"{"a":"b+c"}"#),
            ("sign", "ab/cd=="),
        ]);
        assert_eq!(
            query,
            "timestamp=2024-05-20%2010%3A30%3A00&req=%7B%22a%22%3A%22b%2Bc%22%7D&sign=ab%2Fcd%3D%3D"
        );
        assert_eq!(encode_query([("name", "张")]), "name=%E5%BC%A0");
    }

    #[test_case(json!("abc"), "abc")]
    #[test_case(json!(50), "50")]
    #[test_case(json!(true), "true")]
    #[test_case(json!(null), "null")]
    #[test_case(json!({"b": 1, "a": [1, "x"]}), r#"{"b":1,"a":[1,"x"]}"#)]
    fn test_value_to_string(value: Value, expected: &str) {
        assert_eq!(value_to_string(&value), expected);
    }

    #[test_case("complaint_id", "complaintId")]
    #[test_case("response_content", "responseContent")]
    #[test_case("SIGNED_MSG_MER", "signedMsgMer")]
    #[test_case("ContractNo", "contractNo")]
    #[test_case("trxid", "trxid")]
    #[test_case("TRXID", "trxid")]
    #[test_case("imagebase64", "imagebase64")]
    #[test_case("bizUserId", "bizUserId")]
    #[test_case("bizUserID", "bizUserId")]
    #[test_case("XMLHttpRequest", "xmlHttpRequest")]
    #[test_case("acct2no", "acct2No")]
    #[test_case("", "")]
    fn test_to_camel_case(input: &str, expected: &str) {
        assert_eq!(to_camel_case(input), expected);
    }

    #[test]
    fn test_camel_case_keys() {
        let value = json!({
            "complaint_id": "c1",
            "list": [{"out_trade_no": "o1"}],
            "nested": {"user_name": "n"},
        });
        assert_eq!(
            camel_case_keys(value),
            json!({
                "complaintId": "c1",
                "list": [{"outTradeNo": "o1"}],
                "nested": {"userName": "n"},
            })
        );
    }
}
