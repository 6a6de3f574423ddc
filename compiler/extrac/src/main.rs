//! Extra CLI

use extrac::commands::{
    check_file, explain_error, format_file, lisp_file, parse_file, type_file, SourceKind,
};

fn main() {
    extrac::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let kind = SourceKind::from_flags(&args[2..]);
    let path = args.iter().skip(2).find(|arg| !arg.starts_with('-') || *arg == "-");

    match command.as_str() {
        "parse" | "lisp" | "fmt" | "type" | "check" => {
            let Some(path) = path else {
                eprintln!("error: missing file path");
                eprintln!("Usage: extra {command} <file> [--expr | --view]");
                std::process::exit(1);
            };
            match command.as_str() {
                "parse" => parse_file(path, kind),
                "lisp" => lisp_file(path, kind),
                "fmt" => {
                    let check = args.iter().any(|arg| arg == "--check");
                    format_file(path, kind, check);
                }
                "type" => type_file(path, kind),
                _ => check_file(path, kind),
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("Extra {}", env!("CARGO_PKG_VERSION"));
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: extra --explain <ERROR_CODE>");
                eprintln!("Example: extra --explain E2001");
                std::process::exit(1);
            }
            explain_error(&args[2]);
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Extra parser and type checker");
    println!();
    println!("Usage: extra <command> <file> [options]");
    println!();
    println!("Commands:");
    println!("  parse <file>         Parse and display the tree");
    println!("  lisp <file>          Display operator structure as S-expressions");
    println!("  fmt <file>           Print the file in canonical form");
    println!("  type <file>          Display the type of each declaration");
    println!("  check <file>         Type check a file");
    println!("  --explain <code>     Explain an error code (e.g., E2001)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --expr, -e           The file holds one expression");
    println!("  --view               The file holds one expression; `<tag>` starts a view");
    println!("  --check              (fmt) Exit 1 if the file is not formatted");
    println!();
    println!("A file path of `-` reads from stdin.");
    println!();
    println!("Examples:");
    println!("  extra check app.extra");
    println!("  extra type app.extra");
    println!("  echo '1 + 2 * 3' | extra lisp - --expr");
    println!("  RUST_LOG=extra_types=debug extra check app.extra");
    println!("  RUST_LOG=debug EXTRA_LOG_TREE=1 extra check app.extra");
}
