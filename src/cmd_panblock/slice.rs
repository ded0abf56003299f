use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("slice")
        .about("Cut a block on a consensus interval")
        .after_help(
            r###"
Produces a new block covering consensus positions [LO, HI). Edits keyed in
the interval travel with it; deletions overlapping the cut are clipped. The
member set is preserved.

Positions are 1-based, so `--interval 1:5` selects the first four columns.

Examples:
1. The middle of a block:
   panblock slice tests/block/acgt.json --interval 3:7

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
            Arg::new("interval")
                .long("interval")
                .short('i')
                .required(true)
                .num_args(1)
                .help("Half-open consensus interval LO:HI"),
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
    let iv: panblock::Interval = args
        .get_one::<String>("interval")
        .unwrap()
        .parse()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let block = crate::cmd_panblock::read_block(args.get_one::<String>("infile").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    let sliced = block.slice(iv)?;

    writer.write_all(sliced.to_json().as_ref())?;
    writer.write_all(b"\n")?;

    Ok(())
}
