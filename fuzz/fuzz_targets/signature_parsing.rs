// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Signature parsing under adversarial input.
//!
//! Parameter lists arrive from manifests and the command line. Unbalanced
//! brackets, stray stars and odd literals must come back as errors.

#![no_main]
#![allow(clippy::eq_op)]

use covenant::SignatureDescriptor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(src) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(sig) = src.parse::<SignatureDescriptor>() else {
        return;
    };

    // Defaults trail the required parameters
    assert_eq!(sig.required_count() + sig.default_count(), sig.positional().len());

    // Receiver helpers are inverses on the receiver slot
    let with = sig.with_receiver();
    assert!(with.has_receiver());
    assert_eq!(with.without_receiver().positional(), sig.without_receiver().positional());

    // A descriptor accepts itself unless a default is unequal to itself (NaN)
    if sig.defaults().all(|(_, v)| v == v) {
        assert!(covenant::check_compatible(&sig, &sig).is_ok());
    }
});
