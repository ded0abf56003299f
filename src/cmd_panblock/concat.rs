use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("concat")
        .about("Join blocks sharing one member set")
        .after_help(
            r###"
Concatenates blocks left to right. All blocks must carry the exact same
member set; every edit key is shifted by the cumulative prefix length.

Examples:
1. Rejoin two slices:
   panblock concat left.json right.json

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Input block JSON file(s) to process, in order"),
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

    let mut blocks = Vec::new();
    for infile in args.get_many::<String>("infiles").unwrap() {
        blocks.push(crate::cmd_panblock::read_block(infile)?);
    }

    //----------------------------
    // Ops
    //----------------------------
    let refs: Vec<&panblock::Block> = blocks.iter().collect();
    let joined = panblock::Block::concat(&refs)?;

    writer.write_all(joined.to_json().as_ref())?;
    writer.write_all(b"\n")?;

    Ok(())
}
