//! Byte-level zip fixtures: stored entries with arbitrary raw names.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

const SIG_LOCAL_FILE_HEADER: u32 = 0x04034b50;
const SIG_CENTRAL_DIRECTORY: u32 = 0x02014b50;
const SIG_END_OF_CENTRAL_DIR: u32 = 0x06054b50;
const FLAG_UTF8: u16 = 1 << 11;
// Made by Unix, zip format version 2.0.
const VERSION_MADE_BY: u16 = (3 << 8) | 20;
const VERSION_NEEDED: u16 = 20;

/// "ShiftJIS文字列" in Shift-JIS.
pub const SJIS_NAME: &[u8] = b"ShiftJIS\x95\xb6\x8e\x9a\x97\xf1";

pub struct FixtureEntry {
    pub name: Vec<u8>,
    pub utf8: bool,
    pub data: Vec<u8>,
    pub mode: u32,
    /// (year, month, day, hour, minute, second); seconds must be even.
    pub modified: (u16, u16, u16, u16, u16, u16),
}

impl FixtureEntry {
    pub fn new(name: &[u8], utf8: bool, data: &[u8]) -> Self {
        Self {
            name: name.to_vec(),
            utf8,
            data: data.to_vec(),
            mode: 0o100644,
            modified: (2023, 4, 5, 6, 7, 8),
        }
    }

    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    fn dos_time(&self) -> (u16, u16) {
        let (year, month, day, hour, minute, second) = self.modified;
        let time = (hour << 11) | (minute << 5) | (second / 2);
        let date = ((year - 1980) << 9) | (month << 5) | day;
        (time, date)
    }
}

fn put16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub fn build_zip(entries: &[FixtureEntry]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();

    for entry in entries {
        let offset = out.len() as u32;
        let flags = if entry.utf8 { FLAG_UTF8 } else { 0 };
        let (time, date) = entry.dos_time();
        let crc = crc32fast::hash(&entry.data);
        let size = entry.data.len() as u32;

        put32(&mut out, SIG_LOCAL_FILE_HEADER);
        put16(&mut out, VERSION_NEEDED);
        put16(&mut out, flags);
        put16(&mut out, 0); // stored
        put16(&mut out, time);
        put16(&mut out, date);
        put32(&mut out, crc);
        put32(&mut out, size);
        put32(&mut out, size);
        put16(&mut out, entry.name.len() as u16);
        put16(&mut out, 0);
        out.extend_from_slice(&entry.name);
        out.extend_from_slice(&entry.data);

        put32(&mut central, SIG_CENTRAL_DIRECTORY);
        put16(&mut central, VERSION_MADE_BY);
        put16(&mut central, VERSION_NEEDED);
        put16(&mut central, flags);
        put16(&mut central, 0);
        put16(&mut central, time);
        put16(&mut central, date);
        put32(&mut central, crc);
        put32(&mut central, size);
        put32(&mut central, size);
        put16(&mut central, entry.name.len() as u16);
        put16(&mut central, 0); // extra
        put16(&mut central, 0); // comment
        put16(&mut central, 0); // disk
        put16(&mut central, 0); // internal attributes
        put32(&mut central, entry.mode << 16);
        put32(&mut central, offset);
        central.extend_from_slice(&entry.name);
    }

    let central_offset = out.len() as u32;
    out.extend_from_slice(&central);

    put32(&mut out, SIG_END_OF_CENTRAL_DIR);
    put16(&mut out, 0);
    put16(&mut out, 0);
    put16(&mut out, entries.len() as u16);
    put16(&mut out, entries.len() as u16);
    put32(&mut out, central.len() as u32);
    put32(&mut out, central_offset);
    put16(&mut out, 0);
    out
}

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Per-test unique directory to avoid conflicts with parallel test execution.
pub fn test_dir() -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("sjis-zip-test-{}-{n}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a fixture archive into a fresh test directory.
pub fn write_zip(entries: &[FixtureEntry]) -> (PathBuf, PathBuf) {
    let dir = test_dir();
    let path = dir.join("test.zip");
    std::fs::write(&path, build_zip(entries)).unwrap();
    (path, dir)
}

/// Entry 0 named in Shift-JIS, entry 1 in UTF-8 with the flag set.
pub fn mixed_archive() -> Vec<FixtureEntry> {
    vec![
        FixtureEntry::new(SJIS_NAME, false, b"sjis contents"),
        FixtureEntry::new("UTF8文字列".as_bytes(), true, b"utf8 contents").mode(0o100600),
    ]
}
