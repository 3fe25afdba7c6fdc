//! End-to-end scaffolding against a real directory.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use terrace_config::ConfigReader;
use terrace_core::{CoreError, Scaffolder, StageError};
use terrace_iac::SourceModuleResolver;
use terrace_templates::{FileOutcome, HclFormatter, OsFs, TemplateError, TemplateSet};

const CONFIG: &str = r#"{
  "defaults": {
    "aws_region_backend": "us-west-2",
    "aws_region_provider": "us-west-2",
    "aws_regions": ["us-west-2"],
    "aws_profile_backend": "acme-id",
    "aws_profile_provider": "acme-id",
    "aws_provider_version": "1.27.0",
    "infra_s3_bucket": "acme-infra",
    "owner": "infra@acme.example",
    "project": "acme",
    "terraform_version": "0.11.7",
    "extra_vars": {"team": "platform"}
  },
  "accounts": {
    "prod": {"account_id": 111111111111},
    "dev": {"account_id": 222222222222}
  },
  "envs": {
    "staging": {
      "aws_region_provider": "us-east-1",
      "components": {
        "vpc": {"module_source": "terraform/modules/vpc"},
        "dns": {}
      }
    }
  },
  "modules": {
    "vpc": {}
  }
}"#;

fn setup() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("terrace.json"), CONFIG).unwrap();

    let module = temp.path().join("terraform/modules/vpc");
    fs::create_dir_all(&module).unwrap();
    fs::write(module.join("variables.tf"), "variable \"cidr\" {}\n").unwrap();
    fs::write(module.join("outputs.tf"), "output \"vpc_id\" {\n  value = 1\n}\n").unwrap();
    temp
}

#[test]
fn test_scaffold_repository() {
    let temp = setup();
    let config = ConfigReader::read(temp.path().join("terrace.json")).unwrap();
    let fs = OsFs::new(temp.path());
    let resolver = SourceModuleResolver::new(temp.path());

    let report = Scaffolder::new(&fs, &HclFormatter, &resolver)
        .apply(&config, &TemplateSet::builtin())
        .unwrap();

    let root = temp.path();
    assert!(root.join("Makefile").is_file());
    assert!(root.join("README.md").is_file());
    assert!(root.join("terraform/global/terrace.tf").is_file());
    assert!(root.join("terraform/accounts/dev/terrace.tf").is_file());
    assert!(root.join("terraform/envs/staging/Makefile").is_file());

    let account = fs::read_to_string(root.join("terraform/accounts/prod/terrace.tf")).unwrap();
    assert!(account.contains("111111111111"));
    assert!(account.contains("222222222222"));

    let dns = fs::read_to_string(root.join("terraform/envs/staging/dns/terrace.tf")).unwrap();
    assert!(dns.contains("\"us-east-1\""));
    assert!(dns.contains("\"vpc\""));

    let main = fs::read_to_string(root.join("terraform/envs/staging/vpc/main.tf")).unwrap();
    assert!(main.contains("\"../../../modules/vpc\""));
    assert!(main.contains("local.cidr"));

    // the module's own files were seeded earlier and must survive
    let variables = fs::read_to_string(root.join("terraform/modules/vpc/variables.tf")).unwrap();
    assert_eq!(variables, "variable \"cidr\" {}\n");
    assert_eq!(
        report.files.outcome(Path::new("terraform/modules/vpc/variables.tf")),
        Some(FileOutcome::Skipped)
    );
}

#[test]
fn test_rerun_preserves_user_files() {
    let temp = setup();
    let config = ConfigReader::read(temp.path().join("terrace.json")).unwrap();
    let fs = OsFs::new(temp.path());
    let resolver = SourceModuleResolver::new(temp.path());
    let scaffolder = Scaffolder::new(&fs, &HclFormatter, &resolver);

    scaffolder.apply(&config, &TemplateSet::builtin()).unwrap();

    let main = temp.path().join("terraform/global/main.tf");
    fs::write(&main, "resource \"aws_s3_bucket\" \"logs\" {}\n").unwrap();
    let readme = temp.path().join("README.md");
    fs::write(&readme, "ours").unwrap();

    scaffolder.apply(&config, &TemplateSet::builtin()).unwrap();

    assert_eq!(
        fs::read_to_string(&main).unwrap(),
        "resource \"aws_s3_bucket\" \"logs\" {}\n"
    );
    assert_eq!(fs::read_to_string(&readme).unwrap(), "ours");
}

#[test]
fn test_broken_template_stops_the_run() {
    let temp = setup();
    let config = ConfigReader::read(temp.path().join("terrace.json")).unwrap();
    let templates_dir = temp.path().join("custom-templates/global");
    fs::create_dir_all(&templates_dir).unwrap();
    fs::write(templates_dir.join("broken.tf.tmpl"), "{{ no_such_field }}").unwrap();

    let templates = TemplateSet::load(&temp.path().join("custom-templates")).unwrap();
    let fs = OsFs::new(temp.path());
    let resolver = SourceModuleResolver::new(temp.path());

    let err = Scaffolder::new(&fs, &HclFormatter, &resolver)
        .apply(&config, &templates)
        .unwrap_err();

    assert_eq!(err.stage(), Some("global"));
    assert!(matches!(
        err,
        CoreError::Stage {
            source: StageError::Template(TemplateError::RenderingFailed { .. }),
            ..
        }
    ));
    assert!(!temp.path().join("terraform/accounts").exists());
}
