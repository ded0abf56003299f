extern crate clap;
use clap::*;

mod cmd_panblock;

fn main() -> anyhow::Result<()> {
    let app = Command::new("panblock")
        .version(crate_version!())
        .about("`panblock` - Pangenome alignment blocks")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_panblock::info::make_subcommand())
        .subcommand(cmd_panblock::consensus::make_subcommand())
        .subcommand(cmd_panblock::slice::make_subcommand())
        .subcommand(cmd_panblock::concat::make_subcommand())
        .subcommand(cmd_panblock::revcomp::make_subcommand())
        .subcommand(cmd_panblock::reconsensus::make_subcommand())
        .subcommand(cmd_panblock::combine::make_subcommand())
        .after_help(
            r###"Subcommand groups:

* Inspection:
    * info      - Block id, sizes and members
    * consensus - Consensus or per-member FASTA

* Block surgery:
    * slice       - Cut a block on a consensus interval
    * concat      - Join blocks sharing one member set
    * revcomp     - Reverse complement a block
    * reconsensus - Re-canonicalise the consensus

* Merging:
    * combine - Fuse two blocks along a pairwise alignment

Blocks are stored as canonical JSON; all subcommands accept gzipped
input and the `stdin`/`stdout` sentinels.

"###,
        );

    match app.get_matches().subcommand() {
        Some(("info", sub_matches)) => cmd_panblock::info::execute(sub_matches),
        Some(("consensus", sub_matches)) => cmd_panblock::consensus::execute(sub_matches),
        Some(("slice", sub_matches)) => cmd_panblock::slice::execute(sub_matches),
        Some(("concat", sub_matches)) => cmd_panblock::concat::execute(sub_matches),
        Some(("revcomp", sub_matches)) => cmd_panblock::revcomp::execute(sub_matches),
        Some(("reconsensus", sub_matches)) => cmd_panblock::reconsensus::execute(sub_matches),
        Some(("combine", sub_matches)) => cmd_panblock::combine::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
