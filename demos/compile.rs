use clap::Parser;

use qint_rs::compile::Compiler;
use qint_rs::limits::Limits;
use qint_rs::signature::Signature;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Expressions to compile.
    #[arg(value_name = "EXPR", required = true)]
    exprs: Vec<String>,

    /// Maximum number of distinct integers per expression.
    #[clap(long, value_name = "INT", default_value = "16")]
    max_symbols: usize,

    /// Maximum depth of the parser stacks.
    #[clap(long, value_name = "INT", default_value = "256")]
    max_stack_size: usize,

    /// Fail on expressions that are always false.
    #[clap(long)]
    throw_false: bool,

    /// Fail on expressions that are always true.
    #[clap(long)]
    throw_true: bool,

    /// Trace the parser.
    #[clap(long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let compiler = Compiler::new(Limits::new(args.max_symbols, args.max_stack_size)?);
    println!("limits = {:?}", compiler.limits());

    let mut signatures: Vec<Option<Signature>> = Vec::with_capacity(args.exprs.len());
    let mut failed = 0;
    for (i, expr) in args.exprs.iter().enumerate() {
        println!("----------------------------------");
        println!("[{}] {}", i, expr);

        let parsed = match compiler.parse(expr) {
            Ok(parsed) => parsed,
            Err(e) => {
                println!("{}", e.render(expr));
                failed += 1;
                signatures.push(None);
                continue;
            }
        };
        print!("{}", parsed.root.pretty());

        match compiler.compile_parsed(parsed, args.throw_false, args.throw_true) {
            Ok(signature) => {
                println!("H = {}", signature);
                println!("kind = {:?}, literals = {:?}", signature.kind(), signature.literals());
                signatures.push(Some(signature));
            }
            Err(e) => {
                println!("error: {}", e);
                if e.is_resource_limit() {
                    println!("(resource limit)");
                }
                failed += 1;
                signatures.push(None);
            }
        }
    }

    if signatures.len() > 1 {
        println!("----------------------------------");
        for (i, a) in signatures.iter().enumerate() {
            let row: Vec<&str> = signatures
                .iter()
                .map(|b| match (a, b) {
                    (Some(a), Some(b)) if a == b => "==",
                    (Some(_), Some(_)) => "!=",
                    _ => "--",
                })
                .collect();
            println!("[{}] {}", i, row.join(" "));
        }
    }

    if failed > 0 {
        eprintln!("{} of {} expressions failed", failed, signatures.len());
        std::process::exit(1);
    }

    Ok(())
}
