//! Variable store and `#name` templating.
//!
//! Variables are process-global for the whole run, including across nested
//! `run` invocations, and always hold text. Names starting with the
//! reserved prefix `b_` belong to the runtime: some are seeded once at
//! construction, some are computed lazily and cached, and the date/time
//! entries are refreshed on every dispatch cycle so they are only as fresh
//! as the interpreter's last tick.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::net::UdpSocket;
use std::thread;

use chrono::{Datelike, Local, Timelike};

use crate::colour;
use crate::RESERVED_PREFIX;

/// Name-to-value bindings, reserved and user alike.
///
/// A `BTreeMap` keeps iteration order defined, which in turn keeps the
/// reserved-name listings deterministic.
#[derive(Debug, Default)]
pub struct VarStore {
    values: BTreeMap<String, String>,
}

fn reserved(name: &str) -> String {
    format!("{RESERVED_PREFIX}{name}")
}

impl VarStore {
    /// A store pre-populated with the reserved variables. Entries that need
    /// computation start empty and are filled by [`VarStore::refresh_reserved`].
    pub fn new() -> Self {
        let mut values = BTreeMap::new();
        values.insert(reserved("arch"), env::consts::ARCH.to_string());
        values.insert(reserved("os"), env::consts::OS.to_string());
        values.insert(
            reserved("cpu"),
            thread::available_parallelism()
                .map(|n| n.get().to_string())
                .unwrap_or_else(|_| "1".to_string()),
        );
        values.insert(
            reserved("tempdir"),
            env::temp_dir().display().to_string(),
        );
        for name in [
            "date_dmy", "date_ymd", "home", "hostname", "ipv4", "time", "user", "wd", "zone",
        ] {
            values.insert(reserved(name), String::new());
        }
        Self { values }
    }

    /// Fill in the reserved variables that need computing. Called before
    /// every dispatch: the date/time entries are refreshed each time while
    /// user/host/home/wd/ipv4 are computed once and cached for the run.
    pub fn refresh_reserved(&mut self) {
        let now = Local::now();
        self.values.insert(
            reserved("date_dmy"),
            format!("{}-{}-{}", now.day(), now.month(), now.year()),
        );
        self.values.insert(
            reserved("date_ymd"),
            format!("{}-{}-{}", now.year(), now.month(), now.day()),
        );
        self.values.insert(
            reserved("time"),
            format!("{}-{}-{}", now.hour(), now.minute(), now.second()),
        );
        self.values
            .insert(reserved("zone"), now.format("%Z").to_string());

        self.fill_cached("user", || {
            env::var("USER").or_else(|_| env::var("USERNAME")).ok()
        });
        self.fill_cached("hostname", hostname);
        self.fill_cached("home", || {
            dirs::home_dir().map(|path| path.display().to_string())
        });
        self.fill_cached("wd", || {
            env::current_dir().ok().map(|path| path.display().to_string())
        });
        self.fill_cached("ipv4", || Some(local_ipv4()));
    }

    fn fill_cached<F>(&mut self, name: &str, compute: F)
    where
        F: FnOnce() -> Option<String>,
    {
        let key = reserved(name);
        let missing = self.values.get(&key).map_or(true, String::is_empty);
        if missing {
            if let Some(value) = compute() {
                self.values.insert(key, value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Store a binding without any naming checks. The `set`/`ask` handlers
    /// run [`VarStore::check_reserved_prefix`] before calling this.
    pub fn assign(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    /// Reject user assignments into the reserved namespace. The message
    /// enumerates the reserved names as guidance.
    pub fn check_reserved_prefix(&self, name: &str) -> Result<(), String> {
        if !name.starts_with(RESERVED_PREFIX) {
            return Ok(());
        }
        Err(format!(
            "You've named a variable {} which starts with {} (this is not \
             allowed). If you were trying to use a reserved variable, consult \
             the following list: {}",
            colour::yellow(name),
            colour::yellow(RESERVED_PREFIX),
            self.list_reserved(),
        ))
    }

    /// The reserved variable names, sorted, one per indented line.
    pub fn list_reserved(&self) -> String {
        // BTreeMap iteration is already lexicographic.
        self.values
            .keys()
            .filter(|name| name.starts_with(RESERVED_PREFIX))
            .map(|name| format!("\n\t- {}", colour::magenta(name)))
            .collect()
    }

    /// Replace every `#name` reference with the variable's current value.
    ///
    /// Longest names substitute first so a name that is a prefix of another
    /// (`#ver` vs `#version`) can never clip the longer reference.
    pub fn substitute(&self, input: &str) -> String {
        let mut names: Vec<&String> = self.values.keys().collect();
        names.sort_by_key(|name| std::cmp::Reverse(name.len()));

        let mut output = input.to_string();
        for name in names {
            let marker = format!("{}{}", crate::SYMBOL_SUBSTITUTION, name);
            if output.contains(&marker) {
                output = output.replace(&marker, &self.values[name]);
            }
        }
        output
    }
}

fn hostname() -> Option<String> {
    env::var("HOSTNAME")
        .or_else(|_| env::var("COMPUTERNAME"))
        .ok()
        .or_else(|| {
            fs::read_to_string("/etc/hostname")
                .ok()
                .map(|name| name.trim().to_string())
        })
        .filter(|name| !name.is_empty())
}

/// First non-loopback IPv4 address, found by asking the OS which local
/// address it would route an outbound datagram through. No packet is sent.
fn local_ipv4() -> String {
    let probe = || -> Option<String> {
        let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
        socket.connect("8.8.8.8:80").ok()?;
        let addr = socket.local_addr().ok()?;
        if addr.ip().is_loopback() {
            return None;
        }
        Some(addr.ip().to_string())
    };
    probe().unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitution_round_trip() {
        let mut store = VarStore::new();
        store.assign("lang", "X");
        store.assign("version", "4");
        assert_eq!(store.substitute("App: #lang v#version"), "App: X v4");
    }

    #[test]
    fn longest_name_substitutes_first() {
        let mut store = VarStore::new();
        store.assign("ver", "SHORT");
        store.assign("version", "LONG");
        assert_eq!(store.substitute("#version and #ver"), "LONG and SHORT");
    }

    #[test]
    fn unknown_names_pass_through() {
        let store = VarStore::new();
        assert_eq!(store.substitute("keep #nothing here"), "keep #nothing here");
    }

    #[test]
    fn reserved_prefix_is_rejected() {
        let store = VarStore::new();
        let err = store.check_reserved_prefix("b_anything").unwrap_err();
        assert!(err.contains("b_"));
        assert!(err.contains("b_home"));
        assert!(store.check_reserved_prefix("anything").is_ok());
    }

    #[test]
    fn refresh_populates_dates_and_keeps_cache() {
        let mut store = VarStore::new();
        store.refresh_reserved();
        let date = store.get("b_date_ymd").unwrap().to_string();
        assert_eq!(date.split('-').count(), 3);

        // Cached entries survive a second refresh untouched.
        store.values.insert(reserved("hostname"), "pinned".into());
        store.refresh_reserved();
        assert_eq!(store.get("b_hostname"), Some("pinned"));
    }

    #[test]
    fn static_reserved_values_are_seeded() {
        let store = VarStore::new();
        assert_eq!(store.get("b_os"), Some(env::consts::OS));
        assert_eq!(store.get("b_arch"), Some(env::consts::ARCH));
        assert!(!store.get("b_cpu").unwrap().is_empty());
    }

    #[test]
    fn reserved_listing_is_sorted() {
        let listing = VarStore::new().list_reserved();
        let arch = listing.find("b_arch").unwrap();
        let zone = listing.find("b_zone").unwrap();
        assert!(arch < zone);
    }
}
