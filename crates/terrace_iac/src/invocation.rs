//! Generation of the files that instantiate a reusable module inside a
//! component.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use terrace_templates::{ApplyReport, FileOutcome, TemplateEngine, TemplateTree};

use crate::address::ModuleAddress;
use crate::error::{IacError, IacResult};
use crate::resolver::{ModuleMetadata, ModuleResolver};

/// Invocation templates every module-invocation tree must provide.
pub const MAIN_TEMPLATE: &str = "main.tf.tmpl";
pub const OUTPUTS_TEMPLATE: &str = "outputs.tf.tmpl";

/// Substitution data for the invocation templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInvocationData {
    pub module_name: String,
    /// `source` as seen from the component directory.
    pub module_source: String,
    /// Sorted, without duplicates.
    pub variables: Vec<String>,
    /// Sorted, without duplicates.
    pub outputs: Vec<String>,
}

impl ModuleInvocationData {
    pub fn new(
        address: &ModuleAddress,
        component_dir: &Path,
        metadata: ModuleMetadata,
    ) -> IacResult<Self> {
        Ok(Self {
            module_name: address.display_name(),
            module_source: address.source_for(component_dir)?,
            variables: sorted_unique(metadata.variables),
            outputs: sorted_unique(metadata.outputs),
        })
    }
}

fn sorted_unique(names: Vec<String>) -> Vec<String> {
    names.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Writes `main.tf` and `outputs.tf` for components with a module source.
pub struct ModuleInvocationGenerator<'a, 'e> {
    engine: &'a TemplateEngine<'e>,
    resolver: &'a dyn ModuleResolver,
    templates: &'a TemplateTree,
}

impl<'a, 'e> ModuleInvocationGenerator<'a, 'e> {
    pub fn new(
        engine: &'a TemplateEngine<'e>,
        resolver: &'a dyn ModuleResolver,
        templates: &'a TemplateTree,
    ) -> Self {
        Self {
            engine,
            resolver,
            templates,
        }
    }

    /// Generate the invocation of `module_address` in `component_dir`.
    ///
    /// Both files are rendered and formatted before either is written.
    pub fn generate(&self, component_dir: &Path, module_address: &str) -> IacResult<ApplyReport> {
        self.engine
            .fs()
            .create_dir_all(component_dir)
            .map_err(|e| IacError::io(component_dir, e))?;

        let address = ModuleAddress::detect(module_address);
        let metadata = self.resolver.resolve(&address)?;
        let data = ModuleInvocationData::new(&address, component_dir, metadata)?;

        info!(
            "Generating invocation of module {} ({}) in {:?}",
            data.module_name,
            address.kind(),
            component_dir
        );

        let mut rendered = Vec::with_capacity(2);
        for name in [MAIN_TEMPLATE, OUTPUTS_TEMPLATE] {
            let entry = self.templates.open(name)?;
            let target = component_dir.join(Path::new(name).with_extension(""));
            let contents = self.engine.render_source(&target, &entry.contents, &data)?;
            let contents = self.engine.format_for(&target, contents)?;
            rendered.push((target, contents));
        }

        let mut report = ApplyReport::default();
        for (target, contents) in rendered {
            self.engine.write(&target, &contents)?;
            info!("{} {}", target.display(), FileOutcome::Rendered);
            report.record(target, FileOutcome::Rendered);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MockModuleResolver;
    use terrace_templates::{FormatError, Formatter, MemoryFs, Passthrough, TargetFs, TemplateSet};

    /// Fails on any document declaring an output.
    struct RejectOutputs;

    impl Formatter for RejectOutputs {
        fn format(&self, source: &[u8]) -> Result<Vec<u8>, FormatError> {
            if String::from_utf8_lossy(source).contains("output ") {
                Err(FormatError("unbalanced block".to_string()))
            } else {
                Ok(source.to_vec())
            }
        }
    }

    fn metadata(variables: &[&str], outputs: &[&str]) -> ModuleMetadata {
        ModuleMetadata {
            variables: variables.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_invocation_data_is_sorted() {
        let address = ModuleAddress::detect("terraform/modules/vpc");
        let data = ModuleInvocationData::new(
            &address,
            Path::new("terraform/envs/prod/vpc"),
            metadata(&["b", "a", "b"], &["y", "x"]),
        )
        .unwrap();

        assert_eq!(data.module_name, "vpc");
        assert_eq!(data.module_source, "../../../modules/vpc");
        assert_eq!(data.variables, vec!["a", "b"]);
        assert_eq!(data.outputs, vec!["x", "y"]);
    }

    #[test]
    fn test_generate_writes_both_files() {
        let fs = MemoryFs::new();
        let engine = TemplateEngine::new(&fs, &Passthrough);
        let templates = TemplateSet::builtin();

        let mut resolver = MockModuleResolver::new();
        resolver
            .expect_resolve()
            .withf(|address| {
                address.raw() == "git::https://example.com/modules.git//vpc?ref=v1.2.0"
            })
            .times(1)
            .returning(|_| Ok(metadata(&["b", "a"], &["y", "x"])));

        let generator =

            ModuleInvocationGenerator::new(&engine, &resolver, &templates.module_invocation);
        let report = generator
            .generate(
                Path::new("terraform/envs/prod/vpc"),
                "git::https://example.com/modules.git//vpc?ref=v1.2.0",
            )
            .unwrap();

        assert_eq!(report.count(FileOutcome::Rendered), 2);
        let main = fs.read(Path::new("terraform/envs/prod/vpc/main.tf")).unwrap();
        let main = String::from_utf8(main).unwrap();
        assert!(main.contains("module \"vpc\""));
        assert!(main.contains("\"git::https://example.com/modules.git//vpc?ref=v1.2.0\""));
        let a = main.find("a = local.a").unwrap();
        let b = main.find("b = local.b").unwrap();
        assert!(a < b);

        let outputs = fs.read(Path::new("terraform/envs/prod/vpc/outputs.tf")).unwrap();
        let outputs = String::from_utf8(outputs).unwrap();
        let x = outputs.find("output \"x\"").unwrap();
        let y = outputs.find("output \"y\"").unwrap();
        assert!(x < y);
        assert!(outputs.contains("module.vpc.x"));
    }

    #[test]
    fn test_resolver_failure_writes_nothing() {
        let fs = MemoryFs::new();
        let engine = TemplateEngine::new(&fs, &Passthrough);
        let templates = TemplateSet::builtin();

        let mut resolver = MockModuleResolver::new();
        resolver
            .expect_resolve()
            .returning(|address| Err(IacError::UnsupportedSource(address.raw().to_string())));

        let generator =

            ModuleInvocationGenerator::new(&engine, &resolver, &templates.module_invocation);
        assert!(generator.generate(Path::new("c"), "s3::bucket/vpc").is_err());
        assert!(fs.files().is_empty());
    }

    #[test]
    fn test_format_failure_keeps_previous_pair() {
        let fs = MemoryFs::new();
        fs.create_dir_all(Path::new("terraform/envs/prod/vpc")).unwrap();
        fs.write(Path::new("terraform/envs/prod/vpc/main.tf"), b"OLD MAIN").unwrap();
        fs.write(Path::new("terraform/envs/prod/vpc/outputs.tf"), b"OLD OUTPUTS").unwrap();

        let engine = TemplateEngine::new(&fs, &RejectOutputs);
        let templates = TemplateSet::builtin();

        let mut resolver = MockModuleResolver::new();
        resolver
            .expect_resolve()
            .returning(|_| Ok(metadata(&["cidr"], &["vpc_id"])));

        let generator =

            ModuleInvocationGenerator::new(&engine, &resolver, &templates.module_invocation);
        let err = generator
            .generate(Path::new("terraform/envs/prod/vpc"), "terraform/modules/vpc")
            .unwrap_err();

        assert!(matches!(err, IacError::Template(_)));
        assert_eq!(fs.read(Path::new("terraform/envs/prod/vpc/main.tf")).unwrap(), b"OLD MAIN");
        assert_eq!(
            fs.read(Path::new("terraform/envs/prod/vpc/outputs.tf")).unwrap(),
            b"OLD OUTPUTS"
        );
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let fs = MemoryFs::new();
        let engine = TemplateEngine::new(&fs, &Passthrough);
        let templates = TemplateTree::from_entries([(MAIN_TEMPLATE, "module {}")]);

        let mut resolver = MockModuleResolver::new();
        resolver.expect_resolve().returning(|_| Ok(ModuleMetadata::default()));

        let generator = ModuleInvocationGenerator::new(&engine, &resolver, &templates);
        let err = generator.generate(Path::new("c"), "modules/vpc").unwrap_err();
        assert!(matches!(err, IacError::Template(_)));
        assert!(fs.files().is_empty());
    }
}
