// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Compatibility checking over structured descriptors.
//!
//! Builds contract and implementation descriptors from fuzzer-chosen shapes
//! and checks that the relations stay consistent with each other.

#![no_main]

use arbitrary::Arbitrary;
use covenant::{check_compatible, mutually_compatible, Param, SignatureDescriptor};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Shape {
    names: Vec<u8>,
    defaults: u8,
    var_positional: bool,
    var_keyword: bool,
}

impl Shape {
    fn descriptor(&self) -> Option<SignatureDescriptor> {
        let mut names: Vec<String> = Vec::new();
        for &b in self.names.iter().take(8) {
            let name = format!("p{}", b % 12);
            if !names.contains(&name) {
                names.push(name);
            }
        }
        let first_default = names.len().saturating_sub(self.defaults as usize);
        let params = names
            .into_iter()
            .enumerate()
            .map(|(i, n)| {
                if i >= first_default {
                    Param::with_default(n, i as i64)
                } else {
                    Param::required(n)
                }
            })
            .collect();
        SignatureDescriptor::new(
            params,
            self.var_positional.then(|| "rest".to_string()),
            self.var_keyword.then(|| "kw".to_string()),
        )
        .ok()
    }
}

fuzz_target!(|input: (Shape, Shape)| {
    let (Some(a), Some(b)) = (input.0.descriptor(), input.1.descriptor()) else {
        return;
    };

    let forward = check_compatible(&a, &b);
    if let Err(e) = &forward {
        assert!(!e.rule().is_empty());
        assert!(mutually_compatible(&a, &b).is_err());
    }

    let mutual = mutually_compatible(&a, &b).is_ok();
    assert_eq!(mutual, mutually_compatible(&b, &a).is_ok());
    if mutual {
        assert!(forward.is_ok());
        assert!(check_compatible(&b, &a).is_ok());
    }
});
