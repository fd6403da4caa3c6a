use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: {} <symbol>", args[0]);
        process::exit(1);
    }

    match undecorate::demangle(&args[1]) {
        Ok(s) => println!("{}", s),
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}
