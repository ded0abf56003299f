use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("combine")
        .about("Fuse two blocks along a pairwise alignment")
        .after_help(
            r###"
Merges a query block into a reference block along a CIGAR. The aligned
region becomes one or more shared child blocks carrying the members of both
parents; uncovered flanks and indel runs of --maxgap or more columns become
query-only or reference-only slices. Children are written as a JSON array,
ordered along the reference.

Intervals are 1-based half-open in each parent's consensus coordinates.
With --reverse, the query is reverse complemented before merging.

Examples:
1. A full-length merge:
   panblock combine qry.json ref.json --cigar 4M --qry 1:5 --ref 1:5

2. Split at insertions of 100 columns or more:
   panblock combine qry.json ref.json --cigar 500M120I500M \
       --qry 1:1121 --ref 1:1001 --maxgap 100

"###,
        )
        .arg(
            Arg::new("qry.json")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Query block JSON file"),
        )
        .arg(
            Arg::new("ref.json")
                .required(true)
                .num_args(1)
                .index(2)
                .help("Reference block JSON file"),
        )
        .arg(
            Arg::new("cigar")
                .long("cigar")
                .required(true)
                .num_args(1)
                .help("CIGAR of the query against the reference"),
        )
        .arg(
            Arg::new("qry")
                .long("qry")
                .required(true)
                .num_args(1)
                .help("Aligned query interval LO:HI"),
        )
        .arg(
            Arg::new("ref")
                .long("ref")
                .required(true)
                .num_args(1)
                .help("Aligned reference interval LO:HI"),
        )
        .arg(
            Arg::new("reverse")
                .long("reverse")
                .action(ArgAction::SetTrue)
                .help("The alignment orients the query reversed"),
        )
        .arg(
            Arg::new("maxgap")
                .long("maxgap")
                .num_args(1)
                .default_value("100")
                .value_parser(value_parser!(usize))
                .help("Indel runs of this many columns or more split the alignment"),
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
    let maxgap = *args.get_one::<usize>("maxgap").unwrap();

    let qry = crate::cmd_panblock::read_block(args.get_one::<String>("qry.json").unwrap())?;
    let refr = crate::cmd_panblock::read_block(args.get_one::<String>("ref.json").unwrap())?;

    let aln = panblock::Alignment {
        cigar: args.get_one::<String>("cigar").unwrap().parse()?,
        orientation: if args.get_flag("reverse") {
            panblock::Strand::Reverse
        } else {
            panblock::Strand::Forward
        },
        qry_interval: args
            .get_one::<String>("qry")
            .unwrap()
            .parse()
            .map_err(|e| anyhow::anyhow!("{}", e))?,
        ref_interval: args
            .get_one::<String>("ref")
            .unwrap()
            .parse()
            .map_err(|e| anyhow::anyhow!("{}", e))?,
    };

    //----------------------------
    // Ops
    //----------------------------
    let children = panblock::libs::block::combine(&qry, &refr, &aln, maxgap)?;

    //----------------------------
    // Output
    //----------------------------
    // Block JSON is already canonical; assemble the array by hand to keep it
    // byte-stable.
    let items: Vec<String> = children
        .iter()
        .map(|child| {
            format!(
                r#"{{"kind":"{}","block":{}}}"#,
                child.kind(),
                child.block().to_json()
            )
        })
        .collect();
    writer.write_all(format!("[{}]\n", items.join(",")).as_ref())?;

    Ok(())
}
