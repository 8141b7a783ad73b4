#![allow(dead_code)]

pub use sift::testutil::{
    generate_csv_file, setup_ingested_workspace, setup_test_service, write_csv,
};

use sift::service::SiftService;
use sift::workspace::Workspace;

/// Three columns, five rows.
pub const PEOPLE_HEADER: &str = "name,age,city";
pub const PEOPLE_RECORDS: &[&str] = &[
    "alice,34,Paris",
    "bob,27,Oslo",
    "carol,45,Lima",
    "dave,19,Rome",
    "erin,52,Kyiv",
];

/// Create a workspace holding the people file, not yet ingested.
pub fn people_workspace(service: &SiftService) -> Workspace {
    let workspace = service.create_workspace().unwrap();
    write_csv(&workspace.raw_path, PEOPLE_HEADER, PEOPLE_RECORDS).unwrap();
    workspace
}

/// File names present in a workspace directory, sorted.
pub fn workspace_files(workspace: &Workspace) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(&workspace.dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
