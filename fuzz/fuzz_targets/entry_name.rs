//! Fuzz target for entry-name validation.
//!
//! Run with: cargo +nightly fuzz run entry_name
//!
//! Any name that validates must stay inside the container root.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(path) = tiwut::ArchivePath::new(name) else {
        return;
    };

    let s = path.as_str();
    assert_eq!(s, name);
    assert!(!s.starts_with('/'), "absolute name accepted: {:?}", s);
    assert!(!s.contains('\0'), "NUL byte accepted: {:?}", s);
    assert!(!s.contains('\\'), "backslash accepted: {:?}", s);
    for segment in path.segments() {
        assert!(!segment.is_empty(), "empty segment in {:?}", s);
        assert!(segment != "." && segment != "..", "dot segment in {:?}", s);
    }
    assert_eq!(path.is_directory(), s.ends_with('/'));
});
