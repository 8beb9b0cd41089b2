//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

pub const SPECIES: &str = "((A:1,B:1):1,(C:1,D:1):1);\n";

/// One sampled tree, identical in shape to [`SPECIES`].
pub const SINGLE_TOPOLOGY: &str = "#constructor_string\n((A_1,B_1),(C_1,D_1));\n#observations\n1\n\
#Bip_counts\n5\t1\n6\t1\n#Dip_counts\n5\t1\t2\t1\n6\t3\t4\t1\n#last_leafset_id\n6\n\
#leaf-id\nA_1\t1\nB_1\t2\nC_1\t3\nD_1\t4\n\
#set-id\n1\t:\t1\n2\t:\t2\n3\t:\t3\n4\t:\t4\n5\t:\t1\t2\n6\t:\t3\t4\n#END\n";

/// Balanced 4-gene family; `c12` of 10 trees group `{A,B}|{C,D}` and
/// `c13` group `{A,C}|{B,D}`.
pub fn family(c12: u32, c13: u32) -> String {
    format!(
        "#constructor_string\n((A_1,B_1),(C_1,D_1));\n#observations\n10\n\
#Bip_counts\n5\t{c12}\n6\t{c13}\n7\t{c12}\n8\t{c13}\n\
#Dip_counts\n5\t1\t2\t{c12}\n7\t3\t4\t{c12}\n6\t1\t3\t{c13}\n8\t2\t4\t{c13}\n\
#last_leafset_id\n8\n#leaf-id\nA_1\t1\nB_1\t2\nC_1\t3\nD_1\t4\n\
#set-id\n1\t:\t1\n2\t:\t2\n3\t:\t3\n4\t:\t4\n5\t:\t1\t2\n6\t:\t1\t3\n7\t:\t3\t4\n\
8\t:\t2\t4\n#END\n"
    )
}

/// Write a species file and a family summary into `dir`.
pub fn write_inputs(dir: &Path, species: &str, family: &str) -> (PathBuf, PathBuf) {
    let species_path = dir.join("species.newick");
    let summary_path = dir.join("fam1.ale");
    fs::write(&species_path, species).unwrap();
    fs::write(&summary_path, family).unwrap();
    (species_path, summary_path)
}
