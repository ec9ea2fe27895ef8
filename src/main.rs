use std::process::ExitCode;

use clap::Parser;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;
use typed_arena::Arena;

use parity_opt::{
    interp::interpret_value,
    ir::{
        dump::{bb_to_str, bb_to_str_annotated},
        Block,
    },
    opt::{optimize, Pass},
    samples::Sample,
    IrError,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Block to optimize
    #[arg(short, long, value_enum, default_value_t = Sample::EndToEnd)]
    sample: Sample,

    /// Passes to run, in order; repeat the flag to give several
    #[arg(
        short,
        long = "pass",
        value_enum,
        default_values_t = [Pass::Simplify, Pass::DeadCode]
    )]
    passes: Vec<Pass>,

    /// Show the parity fact of every emitted instruction
    #[arg(long)]
    annotate: bool,

    /// Print a line diff between the input and the optimized block
    #[arg(long)]
    diff: bool,

    /// Variable name prefix used when printing
    #[arg(long, default_value = "v")]
    prefix: String,

    /// Argument values; when given, the tail value is computed from both blocks
    #[arg(allow_negative_numbers = true)]
    args: Vec<i64>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,parity_opt=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), IrError> {
    let arena = Arena::new();
    let mut block = Block::new(&arena);
    let tail = args.sample.build(&mut block);

    let input = bb_to_str(&block, &args.prefix)?;
    println!("input ({:?}):", args.sample);
    println!("{input}");

    // 最適化で元のブロックの見え方が変わるので、先に実行しておく
    let expected = if args.args.is_empty() {
        None
    } else {
        Some(interpret_value(&block, &args.args, tail)?)
    };

    let optimized = optimize(&block, &args.passes, &[tail.into()]);
    let output = if args.annotate {
        bb_to_str_annotated(&optimized.block, &args.prefix, |op| optimized.facts.get(op))?
    } else {
        bb_to_str(&optimized.block, &args.prefix)?
    };
    println!();
    println!("optimized ({:?}):", args.passes);
    println!("{output}");

    if args.diff {
        let before = format!("{input}\n");
        let after = format!("{}\n", bb_to_str(&optimized.block, &args.prefix)?);
        println!();
        print!(
            "{}",
            TextDiff::from_lines(&before, &after)
                .unified_diff()
                .header("input", "optimized")
        );
    }

    if let Some(expected) = expected {
        let actual = interpret_value(&optimized.block, &args.args, tail)?;
        println!();
        println!("tail: input = {expected}, optimized = {actual}");
        if expected != actual {
            tracing::error!(expected, actual, "optimized block disagrees with input");
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
