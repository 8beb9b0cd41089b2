//! Reader for the sectioned text format of conditional-clade summaries.
//!
//! ```text
//! #constructor_string
//! ((a_1,b_1),(c_1,d_1));
//! #observations
//! 1000
//! #Bip_counts
//! 5	812
//! #Bip_bls
//! 5	0.13
//! #Dip_counts
//! 5	1	2	812
//! #last_leafset_id
//! 6
//! #leaf-id
//! a_1	1
//! #set-id
//! 5	:	1	2
//! #END
//! ```
//!
//! Sections may appear in any order; blank lines are skipped; unknown
//! sections are ignored with a debug log. Everything after `#END` is ignored.
use std::{collections::BTreeMap, path::Path, str::FromStr};

use tracing::debug;

use crate::posterior::{
    approx::ApproxPosterior,
    errors::{PosteriorError, PosteriorResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Constructor,
    Observations,
    BipCounts,
    BipBls,
    DipCounts,
    LastLeafset,
    LeafId,
    SetId,
    Unknown,
}

impl Section {
    fn from_header(header: &str) -> Section {
        match header {
            "constructor_string" => Section::Constructor,
            "observations" => Section::Observations,
            "Bip_counts" => Section::BipCounts,
            "Bip_bls" => Section::BipBls,
            "Dip_counts" => Section::DipCounts,
            "last_leafset_id" => Section::LastLeafset,
            "leaf-id" => Section::LeafId,
            "set-id" => Section::SetId,
            _ => Section::Unknown,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Section::Constructor => "constructor_string",
            Section::Observations => "observations",
            Section::BipCounts => "Bip_counts",
            Section::BipBls => "Bip_bls",
            Section::DipCounts => "Dip_counts",
            Section::LastLeafset => "last_leafset_id",
            Section::LeafId => "leaf-id",
            Section::SetId => "set-id",
            Section::Unknown => "unknown",
        }
    }
}

struct LineCtx<'l> {
    section: Section,
    line_no: usize,
    line: &'l str,
}

impl LineCtx<'_> {
    fn invalid(&self) -> PosteriorError {
        PosteriorError::InvalidLine {
            section: self.section.name().to_string(),
            line_no: self.line_no,
            line: self.line.to_string(),
        }
    }

    fn parse<T: FromStr>(&self, field: Option<&str>) -> PosteriorResult<T> {
        field.and_then(|f| f.parse::<T>().ok()).ok_or_else(|| self.invalid())
    }
}

/// Parse a summary from its text form.
pub fn parse_summary(text: &str) -> PosteriorResult<ApproxPosterior> {
    let mut section = Section::Unknown;
    let mut constructor: Option<String> = None;
    let mut observations: Option<f64> = None;
    let mut bip_counts = BTreeMap::new();
    let mut bip_bls = BTreeMap::new();
    let mut dip_counts: BTreeMap<usize, BTreeMap<(usize, usize), f64>> = BTreeMap::new();
    let mut last_leafset_id: Option<usize> = None;
    let mut leaf_names = BTreeMap::new();
    let mut sets = BTreeMap::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('#') {
            if header == "END" {
                break;
            }
            section = Section::from_header(header);
            if section == Section::Unknown {
                debug!(header, "skipping unknown summary section");
            }
            continue;
        }

        let ctx = LineCtx { section, line_no: idx + 1, line };
        let mut fields = line.split_whitespace();
        match section {
            Section::Constructor => constructor = Some(line.to_string()),
            Section::Observations => observations = Some(ctx.parse(fields.next())?),
            Section::BipCounts => {
                let id: usize = ctx.parse(fields.next())?;
                bip_counts.insert(id, ctx.parse::<f64>(fields.next())?);
            }
            Section::BipBls => {
                let id: usize = ctx.parse(fields.next())?;
                bip_bls.insert(id, ctx.parse::<f64>(fields.next())?);
            }
            Section::DipCounts => {
                let parent: usize = ctx.parse(fields.next())?;
                let left: usize = ctx.parse(fields.next())?;
                let right: usize = ctx.parse(fields.next())?;
                let count: f64 = ctx.parse(fields.next())?;
                dip_counts.entry(parent).or_default().insert((left, right), count);
            }
            Section::LastLeafset => last_leafset_id = Some(ctx.parse(fields.next())?),
            Section::LeafId => {
                // Gene names never contain whitespace.
                let name = fields.next().ok_or_else(|| ctx.invalid())?;
                let id: usize = ctx.parse(fields.next())?;
                leaf_names.insert(id, name.to_string());
            }
            Section::SetId => {
                let id: usize = ctx.parse(fields.next())?;
                let mut leaves = Vec::new();
                for field in fields.filter(|f| *f != ":") {
                    leaves.push(ctx.parse::<usize>(Some(field))?);
                }
                if leaves.is_empty() {
                    return Err(ctx.invalid());
                }
                leaves.sort_unstable();
                leaves.dedup();
                sets.insert(id, leaves);
            }
            Section::Unknown => {}
        }
    }

    let constructor_string =
        constructor.ok_or(PosteriorError::MissingSection { name: "constructor_string" })?;
    let observations =
        observations.ok_or(PosteriorError::MissingSection { name: "observations" })?;
    if leaf_names.is_empty() {
        return Err(PosteriorError::MissingSection { name: "leaf-id" });
    }
    let last_leafset_id = last_leafset_id
        .unwrap_or_else(|| sets.keys().next_back().copied().unwrap_or(leaf_names.len()));

    ApproxPosterior::new(
        constructor_string,
        observations,
        bip_counts,
        bip_bls,
        dip_counts,
        last_leafset_id,
        leaf_names,
        sets,
    )
}

/// Read and parse a summary file.
pub fn load_summary(path: impl AsRef<Path>) -> PosteriorResult<ApproxPosterior> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| PosteriorError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_summary(&text)
}

impl FromStr for ApproxPosterior {
    type Err = PosteriorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_summary(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_LEAF: &str = "#constructor_string\n((A_1,B_1),C_1);\n#observations\n10\n\
#Bip_counts\n4\t10\n#Bip_bls\n4\t0.25\n#Dip_counts\n4\t1\t2\t10\n#last_leafset_id\n4\n\
#leaf-id\nA_1\t1\nB_1\t2\nC_1\t3\n#set-id\n1\t:\t1\n2\t:\t2\n3\t:\t3\n4\t:\t1\t2\n#END\n";

    #[test]
    // Purpose
    // -------
    // Every section of a well-formed summary lands in the right field.
    fn parse_summary_reads_all_sections() {
        let post = parse_summary(THREE_LEAF).expect("valid summary");

        assert_eq!(post.constructor_string(), "((A_1,B_1),C_1);");
        assert_eq!(post.observations(), 10.0);
        assert_eq!(post.bip_count(4), 10.0);
        assert_eq!(post.mean_branch_length(4), Some(0.25));
        assert_eq!(post.dip_counts()[&4][&(1, 2)], 10.0);
        assert_eq!(post.last_leafset_id(), 4);
        assert_eq!(post.gene_names(), vec!["A_1", "B_1", "C_1"]);
        assert_eq!(post.clade_leaves(4), Some(&[1, 2][..]));
    }

    #[test]
    fn parse_summary_stops_at_end_marker() {
        let text = format!("{THREE_LEAF}garbage that is never read\n");

        assert!(parse_summary(&text).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Missing required sections and malformed lines are reported, not skipped.
    fn parse_summary_rejects_malformed_input() {
        let no_obs = THREE_LEAF.replace("#observations\n10\n", "");
        let bad_dip = THREE_LEAF.replace("4\t1\t2\t10", "4\t1\tx\t10");
        let zero_obs = THREE_LEAF.replace("#observations\n10", "#observations\n0");

        assert_eq!(
            parse_summary(&no_obs),
            Err(PosteriorError::MissingSection { name: "observations" })
        );
        assert!(matches!(
            parse_summary(&bad_dip),
            Err(PosteriorError::InvalidLine { line_no: 10, .. })
        ));
        assert_eq!(
            parse_summary(&zero_obs),
            Err(PosteriorError::InvalidObservations { value: 0.0 })
        );
    }

    #[test]
    fn load_summary_reports_missing_file() {
        let err = load_summary("/definitely/not/here.ale").unwrap_err();

        assert!(matches!(err, PosteriorError::Io { .. }));
    }
}
