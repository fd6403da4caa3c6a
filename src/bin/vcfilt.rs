//! Batch demangler in the manner of `c++filt`: demangles the symbols given
//! as arguments, or each whitespace-separated symbol on stdin when no
//! arguments are given.  A symbol that fails to demangle is reported on
//! stderr and echoed unchanged, so pipelines keep their line count.
//!
//! `--tree` dumps the parsed tree to stderr; `--strict` suppresses the echo
//! and makes any failure fatal to the exit status.

use std::env;
use std::io;
use std::io::BufRead;
use std::process;

struct Options {
    dump_tree: bool,
    strict: bool,
}

fn demangle_symbol(sym: &str, opts: &Options) -> bool {
    let result = undecorate::parse(sym).and_then(|parsed| {
        if opts.dump_tree {
            eprintln!("{:#?}", parsed);
        }
        undecorate::serialize(&parsed)
    });

    match result {
        Ok(decl) => {
            println!("{}", decl);
            true
        }
        Err(err) => {
            eprintln!("{}: {}", sym, err);
            if !opts.strict {
                println!("{}", sym);
            }
            false
        }
    }
}

fn main() {
    let mut opts = Options {
        dump_tree: false,
        strict: false,
    };
    let mut symbols = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-t" | "--tree" => opts.dump_tree = true,
            "-s" | "--strict" => opts.strict = true,
            _ => symbols.push(arg),
        }
    }

    let mut failures = 0;
    if symbols.is_empty() {
        let stdin = io::stdin();
        for line in stdin.lock().lines().flatten() {
            for sym in line.split_whitespace() {
                if !demangle_symbol(sym, &opts) {
                    failures += 1;
                }
            }
        }
    } else {
        for sym in &symbols {
            if !demangle_symbol(sym, &opts) {
                failures += 1;
            }
        }
    }

    if opts.strict && failures > 0 {
        process::exit(1);
    }
}
