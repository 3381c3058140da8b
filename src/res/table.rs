use crate::error::LinkError;
use crate::res::id::ResId;
use std::collections::HashMap;

/// In-memory index of every declared resource of a decoded apk:
/// table -> package -> type group -> spec. Built once per session by the
/// container-format layer; read-only while the smali passes run.
///
/// Specs are owned exclusively by their type group and carry their package
/// and group names as plain data (used only for full-name formatting), so the
/// reverse id index can point at a spec by its name path instead of holding a
/// parent reference.
#[derive(Debug, Default)]
pub struct ResTable {
    packages: HashMap<String, ResPackage>,
    id_index: HashMap<ResId, SpecPath>,
}

#[derive(Debug, Clone)]
struct SpecPath {
    package: String,
    type_name: String,
    spec_name: String,
}

impl ResTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one resource spec. Rejects an id already present in the table
    /// and a short name already present within its (package, type) group.
    pub fn add_spec(
        &mut self,
        id: ResId,
        package: &str,
        type_name: &str,
        name: &str,
    ) -> Result<(), LinkError> {
        if self.id_index.contains_key(&id) {
            return Err(LinkError::DuplicateSpec(id.to_string()));
        }
        let spec = ResSpec {
            id,
            name: name.to_string(),
            type_name: type_name.to_string(),
            package_name: package.to_string(),
        };
        self.packages
            .entry(package.to_string())
            .or_insert_with(|| ResPackage::new(package))
            .add_spec(spec)?;
        self.id_index.insert(
            id,
            SpecPath {
                package: package.to_string(),
                type_name: type_name.to_string(),
                spec_name: name.to_string(),
            },
        );
        Ok(())
    }

    pub fn get_package(&self, name: &str) -> Result<&ResPackage, LinkError> {
        self.packages
            .get(name)
            .ok_or_else(|| LinkError::UndefinedResource(name.to_string()))
    }

    /// Reverse lookup by numeric id.
    pub fn get_res_spec(&self, id: ResId) -> Result<&ResSpec, LinkError> {
        let path = self
            .id_index
            .get(&id)
            .ok_or_else(|| LinkError::UndefinedResource(id.to_string()))?;
        self.get_package(&path.package)?
            .get_type(&path.type_name)?
            .get_res_spec(&path.spec_name)
    }

    /// Forward lookup by symbolic name triple.
    pub fn get_spec_by_name(
        &self,
        package: &str,
        type_name: &str,
        name: &str,
    ) -> Result<&ResSpec, LinkError> {
        self.get_package(package)?
            .get_type(type_name)?
            .get_res_spec(name)
    }
}

#[derive(Debug)]
pub struct ResPackage {
    name: String,
    types: HashMap<String, ResTypeGroup>,
}

impl ResPackage {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            types: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_type(&self, name: &str) -> Result<&ResTypeGroup, LinkError> {
        self.types.get(name).ok_or_else(|| {
            LinkError::UndefinedResource(format!("{}:{}", self.name, name))
        })
    }

    fn add_spec(&mut self, spec: ResSpec) -> Result<(), LinkError> {
        self.types
            .entry(spec.type_name.clone())
            .or_insert_with(|| ResTypeGroup::new(&spec.type_name))
            .add_spec(spec)
    }
}

#[derive(Debug)]
pub struct ResTypeGroup {
    name: String,
    specs: HashMap<String, ResSpec>,
}

impl ResTypeGroup {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            specs: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_res_spec(&self, name: &str) -> Result<&ResSpec, LinkError> {
        self.specs
            .get(name)
            .ok_or_else(|| LinkError::UndefinedResource(format!("{}/{}", self.name, name)))
    }

    fn add_spec(&mut self, spec: ResSpec) -> Result<(), LinkError> {
        if self.specs.contains_key(&spec.name) {
            return Err(LinkError::DuplicateSpec(spec.full_name()));
        }
        self.specs.insert(spec.name.clone(), spec);
        Ok(())
    }
}

/// One named, numerically identified resource slot, independent of its
/// per-configuration value variants.
#[derive(Debug, Clone)]
pub struct ResSpec {
    id: ResId,
    name: String,
    type_name: String,
    package_name: String,
}

impl ResSpec {
    pub fn id(&self) -> ResId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// The human-readable `package:type/name` form written into smali
    /// annotations.
    pub fn full_name(&self) -> String {
        format!("{}:{}/{}", self.package_name, self.type_name, self.name)
    }
}

/// One configuration-specific resource as the values-XML encoder sees it:
/// the spec's short name, the owning type-group name and the source document
/// path. Per-configuration value storage stays in the container-format layer.
#[derive(Debug, Clone)]
pub struct ResResource {
    spec_name: String,
    type_name: String,
    file_path: String,
}

impl ResResource {
    pub fn new(spec_name: &str, type_name: &str, file_path: &str) -> Self {
        Self {
            spec_name: spec_name.to_string(),
            type_name: type_name.to_string(),
            file_path: file_path.to_string(),
        }
    }

    pub fn spec_name(&self) -> &str {
        &self.spec_name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ResTable {
        let mut table = ResTable::new();
        table
            .add_spec(ResId(0x7f020000), "com.example", "string", "app_name")
            .unwrap();
        table
            .add_spec(ResId(0x7f020001), "com.example", "string", "greeting")
            .unwrap();
        table
            .add_spec(ResId(0x7f030000), "com.example", "layout", "main")
            .unwrap();
        table
    }

    #[test]
    fn should_resolve_spec_by_id() {
        let table = sample_table();
        let spec = table.get_res_spec(ResId(0x7f020001)).unwrap();
        assert_eq!(spec.full_name(), "com.example:string/greeting");
        assert_eq!(spec.id(), ResId(0x7f020001));
    }

    #[test]
    fn should_resolve_spec_by_name_chain() {
        let table = sample_table();
        let spec = table
            .get_package("com.example")
            .unwrap()
            .get_type("layout")
            .unwrap()
            .get_res_spec("main")
            .unwrap();
        assert_eq!(spec.id(), ResId(0x7f030000));
    }

    #[test]
    fn should_fail_lookups_for_unknown_entries() {
        let table = sample_table();
        assert!(matches!(
            table.get_res_spec(ResId(0x7f999999)),
            Err(LinkError::UndefinedResource(_))
        ));
        assert!(matches!(
            table.get_spec_by_name("com.example", "string", "missing"),
            Err(LinkError::UndefinedResource(_))
        ));
        assert!(matches!(
            table.get_package("org.other"),
            Err(LinkError::UndefinedResource(_))
        ));
    }

    #[test]
    fn should_reject_duplicate_id() {
        let mut table = sample_table();
        let err = table
            .add_spec(ResId(0x7f020000), "com.example", "drawable", "icon")
            .unwrap_err();
        assert!(matches!(err, LinkError::DuplicateSpec(_)));
    }

    #[test]
    fn should_reject_duplicate_name_within_type_group() {
        let mut table = sample_table();
        let err = table
            .add_spec(ResId(0x7f020099), "com.example", "string", "app_name")
            .unwrap_err();
        assert!(matches!(err, LinkError::DuplicateSpec(_)));
    }
}
