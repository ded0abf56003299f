use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("info")
        .about("Block id, sizes and members")
        .after_help(
            r###"
Prints one line per block: id, consensus length, alignment length and depth.
With --members, each member node follows on its own line with its realized
sequence length.

Examples:
1. Summarize blocks:
   panblock info tests/block/acgt.json

2. Include per-member lengths:
   panblock info tests/block/acgt.json --members

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Input block JSON file(s) to process"),
        )
        .arg(
            Arg::new("members")
                .long("members")
                .action(ArgAction::SetTrue)
                .help("Also list member nodes and their lengths"),
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
    let is_members = args.get_flag("members");

    //----------------------------
    // Ops
    //----------------------------
    writer.write_all(b"#id\tlength\taln_length\tdepth\n")?;
    for infile in args.get_many::<String>("infiles").unwrap() {
        let block = crate::cmd_panblock::read_block(infile)?;
        writer.write_all(
            format!(
                "{}\t{}\t{}\t{}\n",
                block.id(),
                block.len(),
                block.gapped_len(),
                block.depth()
            )
            .as_ref(),
        )?;
        if is_members {
            for node in block.nodes() {
                let len = block.member_len(node).unwrap();
                writer.write_all(format!("{}\tnode\t{}\t{}\n", block.id(), node, len).as_ref())?;
            }
        }
    }

    Ok(())
}
