//! Integration tests for module invocation generation.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use terrace_iac::{
    IacError, ModuleAddress, ModuleInvocationGenerator, SourceKind, SourceModuleResolver,
};
use terrace_templates::{HclFormatter, OsFs, TemplateEngine, TemplateSet};

fn write_module(root: &Path) {
    let module = root.join("terraform/modules/vpc");
    fs::create_dir_all(&module).unwrap();
    fs::write(
        module.join("variables.tf"),
        "variable \"vpc_cidr\" {}\nvariable \"azs\" {}\nvariable \"azs\" {}\n",
    )
    .unwrap();
    fs::write(
        module.join("outputs.tf"),
        "output \"vpc_id\" {\n  value = 1\n}\noutput \"subnet_ids\" {\n  value = []\n}\n",
    )
    .unwrap();
}

#[test]
fn test_local_module_invocation_end_to_end() {
    let temp = TempDir::new().unwrap();
    write_module(temp.path());

    let fs = OsFs::new(temp.path());
    let engine = TemplateEngine::new(&fs, &HclFormatter);
    let resolver = SourceModuleResolver::new(temp.path());
    let templates = TemplateSet::builtin();
    let generator =
        ModuleInvocationGenerator::new(&engine, &resolver, &templates.module_invocation);

    generator
        .generate(Path::new("terraform/envs/prod/vpc"), "terraform/modules/vpc")
        .unwrap();

    let main = fs::read_to_string(temp.path().join("terraform/envs/prod/vpc/main.tf")).unwrap();
    let body = hcl::parse(&main).unwrap();
    let module = body.blocks().next().unwrap();
    assert_eq!(module.identifier(), "module");
    assert_eq!(module.labels()[0].as_str(), "vpc");
    assert!(main.contains("\"../../../modules/vpc\""));
    assert!(main.find("azs").unwrap() < main.find("vpc_cidr").unwrap());
    assert_eq!(main.matches("local.azs").count(), 1);

    let outputs =
        fs::read_to_string(temp.path().join("terraform/envs/prod/vpc/outputs.tf")).unwrap();
    hcl::parse(&outputs).unwrap();
    assert!(outputs.find("subnet_ids").unwrap() < outputs.find("vpc_id").unwrap());
}

#[test]
fn test_regeneration_is_stable() {
    let temp = TempDir::new().unwrap();
    write_module(temp.path());

    let fs = OsFs::new(temp.path());
    let engine = TemplateEngine::new(&fs, &HclFormatter);
    let resolver = SourceModuleResolver::new(temp.path());
    let templates = TemplateSet::builtin();
    let generator =
        ModuleInvocationGenerator::new(&engine, &resolver, &templates.module_invocation);
    let main = temp.path().join("terraform/envs/prod/vpc/main.tf");

    generator
        .generate(Path::new("terraform/envs/prod/vpc"), "terraform/modules/vpc")
        .unwrap();
    let first = fs::read_to_string(&main).unwrap();
    generator
        .generate(Path::new("terraform/envs/prod/vpc"), "terraform/modules/vpc")
        .unwrap();
    assert_eq!(fs::read_to_string(&main).unwrap(), first);
}

#[test]
fn test_missing_local_module_fails() {
    let temp = TempDir::new().unwrap();
    let fs = OsFs::new(temp.path());
    let engine = TemplateEngine::new(&fs, &HclFormatter);
    let resolver = SourceModuleResolver::new(temp.path());
    let templates = TemplateSet::builtin();
    let generator =
        ModuleInvocationGenerator::new(&engine, &resolver, &templates.module_invocation);

    let err = generator
        .generate(Path::new("terraform/envs/prod/vpc"), "terraform/modules/absent")
        .unwrap_err();
    assert!(matches!(err, IacError::ModuleNotFound(_)));
    assert!(!temp.path().join("terraform/envs/prod/vpc/main.tf").exists());
}

#[test]
fn test_address_classification_examples() {
    let local = ModuleAddress::detect("../../modules/vpc");
    assert!(local.is_local());
    assert_eq!(
        local.source_for(Path::new("envs/prod/vpc")).unwrap(),
        "../../../../../modules/vpc"
    );

    let raw = "git::https://example.com/modules.git//vpc?ref=v1.2.0";
    let remote = ModuleAddress::detect(raw);
    assert_eq!(remote.kind(), SourceKind::Git);
    assert_eq!(remote.source_for(Path::new("envs/prod/vpc")).unwrap(), raw);
    assert_eq!(remote.display_name(), "vpc");
}
