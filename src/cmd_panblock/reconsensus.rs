use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("reconsensus")
        .about("Re-canonicalise the consensus")
        .after_help(
            r###"
Recomputes the consensus as the per-column plurality of the members and
re-encodes every edit map against it. Blocks of depth 2 or less are written
back unchanged; the consensus is arbitrary among tied choices there.

Examples:
1. Canonicalise a merged block:
   panblock reconsensus merged.json

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

    let mut block = crate::cmd_panblock::read_block(args.get_one::<String>("infile").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    block.reconsensus();

    writer.write_all(block.to_json().as_ref())?;
    writer.write_all(b"\n")?;

    Ok(())
}
