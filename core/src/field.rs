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

//! Path addressed access and selective encryption of JSON fields.
//!
//! Paths are dotted: `memberInfo.identityCardNo`. A numeric segment indexes
//! into an array, so `bindCardList.0.bankCardNo` reaches the first card.

use crate::{PrivateKey, PublicKey, Result};
use log::debug;
use serde_json::{Map, Value};

/// Key of the partial-success marker set on synthesized results.
pub const ALLOW_KEY: &str = "allow";

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(list) => segment.parse::<usize>().ok().and_then(|i| list.get(i)),
        _ => None,
    }
}

fn step_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(list) => segment
            .parse::<usize>()
            .ok()
            .and_then(move |i| list.get_mut(i)),
        _ => None,
    }
}

/// Get the value at `path`.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, step)
}

/// Get a mutable reference to the value at `path`.
pub fn get_path_mut<'a>(value: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    path.split('.').try_fold(value, step_mut)
}

/// Set the value at `path`, creating intermediate objects as needed.
///
/// An intermediate that is neither an object nor an indexable array is
/// replaced by an empty object.
pub fn set_path(value: &mut Value, path: &str, new: Value) {
    let mut current = value;
    for segment in path.split('.') {
        let indexable = matches!(
            (&*current, segment.parse::<usize>()),
            (Value::Array(list), Ok(i)) if i < list.len()
        );
        if !indexable && !current.is_object() {
            *current = Value::Object(Map::new());
        }

        current = match current {
            Value::Array(list) => {
                // `indexable` guarantees both the parse and the bound.
                let i = segment.parse::<usize>().unwrap_or_default();
                &mut list[i]
            }
            Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
            _ => unreachable!("current has been normalized to a container"),
        };
    }
    *current = new;
}

/// Truthiness as the gateway SDKs have always applied it.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Check whether `value` carries the partial-success marker.
pub fn is_allowed(value: &Value) -> bool {
    value.get(ALLOW_KEY).map(is_truthy).unwrap_or(false)
}

/// Encrypt the fields at `paths` in place.
///
/// Absent, null and empty fields are skipped. Numbers are encrypted in their
/// decimal form. Every other field is left untouched.
pub fn encrypt_fields(value: &mut Value, paths: &[&str], key: &PublicKey) -> Result<()> {
    for path in paths {
        let plain = match get_path(value, path) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(v @ Value::Number(n)) if is_truthy(v) => n.to_string(),
            _ => continue,
        };

        debug!("encrypting field {path}");
        let cipher = key.encrypt_hex(&plain)?;
        set_path(value, path, Value::String(cipher));
    }

    Ok(())
}

/// Decrypt the fields at `paths` in place.
///
/// A value carrying the [`ALLOW_KEY`] marker is left untouched: it is a
/// synthesized result and holds no ciphertext.
pub fn decrypt_fields(value: &mut Value, paths: &[&str], key: &PrivateKey) -> Result<()> {
    if is_allowed(value) {
        return Ok(());
    }

    for path in paths {
        let Some(Value::String(cipher)) = get_path_mut(value, path) else {
            continue;
        };
        if cipher.is_empty() {
            continue;
        }

        debug!("decrypting field {path}");
        *cipher = key.decrypt_hex(cipher)?;
    }

    Ok(())
}
