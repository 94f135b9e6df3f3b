use anyhow::{Context, Result};
use markdown_vellum_engine::{parse, render_html, serialize, to_mdast, write_markdown};
use std::{env, fs, process};

enum Output {
    Html,
    Markdown,
    Ast,
    Check,
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let (path, output) = match args.len() {
        2 => (&args[1], Output::Html),
        3 => {
            let output = match args[1].as_str() {
                "--html" => Output::Html,
                "--markdown" => Output::Markdown,
                "--ast" => Output::Ast,
                "--check" => Output::Check,
                other => {
                    eprintln!("Unknown option: {other}");
                    usage(&args[0]);
                    process::exit(1);
                }
            };
            (&args[2], output)
        }
        _ => {
            usage(&args[0]);
            process::exit(1);
        }
    };

    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let doc = parse(&source);

    match output {
        Output::Html => print!("{}", render_html(&doc)),
        Output::Markdown => print!("{}", write_markdown(&doc)),
        Output::Ast => {
            let ast = to_mdast(&doc);
            println!("{}", serde_json::to_string_pretty(&ast)?);
        }
        Output::Check => {
            if serialize(&doc) == source {
                println!("ok: {} bytes round-trip losslessly", source.len());
            } else {
                eprintln!("round-trip mismatch in {path}");
                process::exit(1);
            }
        }
    }

    Ok(())
}

fn usage(program: &str) {
    eprintln!("Usage: {program} [--html|--markdown|--ast|--check] <file.md>");
}
