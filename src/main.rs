use anyhow::Context;
use clap::Parser;
use nw_pairwise_aligner::{
    cli::Cli,
    render::{format_alignment, format_matrix, SEPARATOR},
    runner::{Limits, PairResult, Runner},
};
use std::{fs::File, io::BufWriter, ops::ControlFlow};

fn print_result(result: &PairResult, silent: u8) {
    let score = result
        .score
        .map_or_else(|| "-inf".to_string(), |s| s.to_string());
    println!(
        "{:?}: score {score}, {}{} optimal alignment(s)",
        result.model,
        if result.truncated { "at least " } else { "" },
        result.alignments.len(),
    );
    for m in &result.matrices {
        println!(
            "{}\n",
            format_matrix(
                &m.title,
                result.seq1.as_bytes(),
                result.seq2.as_bytes(),
                &m.rows
            )
        );
    }
    if silent > 0 {
        return;
    }
    for aln in &result.alignments {
        println!("{}", format_alignment(aln));
        println!("{}", aln.cigar());
        println!("{SEPARATOR}");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let config = args
        .scoring
        .to_config()
        .context("loading scoring configuration")?;
    let limits = Limits {
        max_alignments: args.max_alignments,
        timeout: args.timeout,
    };
    let runner = Runner::new(&config, limits, args.print_matrices)?;

    let mut results = vec![];
    args.input.process_input_pairs(|a, b| {
        if args.output.is_none() {
            println!(
                "seq1: {}\nseq2: {}",
                String::from_utf8_lossy(a),
                String::from_utf8_lossy(b)
            );
        }
        for &model in args.mode.models() {
            let result = runner.run(a, b, model)?;
            match args.output {
                Some(_) => results.push(result),
                None => print_result(&result, args.silent),
            }
        }
        Ok(ControlFlow::Continue(()))
    })?;

    if let Some(output) = &args.output {
        let file = File::create(output)
            .with_context(|| format!("creating {}", output.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &results)?;
    }
    Ok(())
}
