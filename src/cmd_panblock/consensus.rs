use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("consensus")
        .about("Consensus or per-member FASTA")
        .after_help(
            r###"
Writes the block consensus as FASTA. With --node, reconstructs that member's
sequence instead. With --gapped, the alignment row is written, gap columns
as `-`.

Examples:
1. The consensus:
   panblock consensus tests/block/acgt.json

2. One member, aligned:
   panblock consensus tests/block/acgt.json --node 1 --gapped

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
            Arg::new("node")
                .long("node")
                .num_args(1)
                .help("Reconstruct this member instead of the consensus"),
        )
        .arg(
            Arg::new("gapped")
                .long("gapped")
                .action(ArgAction::SetTrue)
                .help("Write the aligned row, gap columns as `-`"),
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
    let is_gapped = args.get_flag("gapped");

    let block = crate::cmd_panblock::read_block(args.get_one::<String>("infile").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    let (name, seq) = match args.get_one::<String>("node") {
        Some(node) => {
            let node: panblock::NodeId = node
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid node id: {}", node))?;
            let seq = if is_gapped {
                block.member_row(node)
            } else {
                block.member_sequence(node)
            }
            .ok_or_else(|| anyhow::anyhow!("node {} is not a member of block {}", node, block.id()))?;
            (format!("{}:{}", block.id(), node), seq)
        }
        None => {
            let seq = if is_gapped {
                block.gapped_consensus()
            } else {
                block.sequence().to_vec()
            };
            (block.id().to_string(), seq)
        }
    };

    //----------------------------
    // Output
    //----------------------------
    writer.write_all(format!(">{}\n", name).as_ref())?;
    writer.write_all(&seq)?;
    writer.write_all(b"\n")?;

    Ok(())
}
