use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("revcomp")
        .about("Reverse complement a block")
        .after_help(
            r###"
Reverse complements the consensus and relocates every gap cluster and edit
to the opposite strand. Applying the command twice restores the input.

Examples:
1. Flip a block:
   panblock revcomp tests/block/acgt.json

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Input block JSON file to process"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let mut writer = panblock::writer(args.get_one::<String>("outfile").unwrap())?;

    let block = crate::cmd_panblock::read_block(args.get_one::<String>("infile").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    let flipped = block.reverse_complement();

    writer.write_all(flipped.to_json().as_ref())?;
    writer.write_all(b"\n")?;

    Ok(())
}
