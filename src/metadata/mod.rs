// src/metadata/mod.rs

//! Build metadata embedded in plugin descriptors
//!
//! A plugin's descriptor (POM) may carry an `additionalPluginDependencies`
//! block in the configuration of its packaging build plugin, declaring
//! libraries that should be attached to *other* plugins of the application:
//!
//! ```xml
//! <plugin>
//!   <groupId>org.mule.tools.maven</groupId>
//!   <artifactId>mule-maven-plugin</artifactId>
//!   <configuration>
//!     <additionalPluginDependencies>
//!       <plugin>
//!         <groupId>org.mule.connectors</groupId>
//!         <artifactId>mule-db-connector</artifactId>
//!         <additionalDependencies>
//!           <dependency>
//!             <groupId>org.postgresql</groupId>
//!             <artifactId>postgresql</artifactId>
//!             <version>42.2.5</version>
//!           </dependency>
//!         </additionalDependencies>
//!       </plugin>
//!     </additionalPluginDependencies>
//!   </configuration>
//! </plugin>
//! ```

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::artifact::{ArtifactCoordinate, DependencyDeclaration, PluginDeclaration, layout};
use crate::error::{Error, Result};

/// Build plugins whose configuration may declare additional dependencies, by priority
const PACKAGER_PLUGINS: &[(&str, &str)] = &[
    ("org.mule.runtime.plugins", "mule-extensions-maven-plugin"),
    ("org.mule.tools.maven", "mule-maven-plugin"),
];

/// Generic descriptor name used when no coordinate-named descriptor exists
pub const DEFAULT_DESCRIPTOR_NAME: &str = "pom.xml";

const BUILD_PLUGIN: &[&str] = &["project", "build", "plugins", "plugin"];
const DECLARATION: &[&str] = &["configuration", "additionalPluginDependencies", "plugin"];
const DECLARED_DEPENDENCY: &[&str] = &["additionalDependencies", "dependency"];

/// Metadata extracted from a plugin's build descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildMetadata {
    /// Additional dependencies this plugin declares for target plugins
    pub additional_plugin_dependencies: Vec<PluginDeclaration>,
}

impl BuildMetadata {
    /// Parse the metadata from descriptor XML
    pub fn from_descriptor_str(xml: &str) -> Result<Self> {
        let build_plugins = DescriptorScanner::scan(xml)?;

        let packager = PACKAGER_PLUGINS.iter().find_map(|(group, artifact)| {
            build_plugins.iter().find(|p| {
                p.group_id.as_deref() == Some(*group) && p.artifact_id.as_deref() == Some(*artifact)
            })
        });

        let Some(packager) = packager else {
            return Ok(Self::default());
        };

        let additional_plugin_dependencies = packager
            .declarations
            .iter()
            .map(RawDeclaration::validate)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            additional_plugin_dependencies,
        })
    }

    /// Parse the metadata from a descriptor file
    pub fn from_descriptor_file(path: &Path) -> Result<Self> {
        let xml = fs::read_to_string(path)?;
        Self::from_descriptor_str(&xml).map_err(|e| match e {
            Error::ConfigError(msg) => {
                Error::ConfigError(format!("{msg} (in {})", path.display()))
            }
            other => other,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.additional_plugin_dependencies.is_empty()
    }
}

/// Locate the descriptor that accompanies a payload file
///
/// Prefers `<artifact>-<version>.pom` next to the payload, then `pom.xml`.
pub fn locate_descriptor(bundle_path: &Path, coordinate: &ArtifactCoordinate) -> Option<PathBuf> {
    let dir = bundle_path.parent()?;
    let named = dir.join(layout::descriptor_file_name(coordinate));
    if named.is_file() {
        return Some(named);
    }
    let generic = dir.join(DEFAULT_DESCRIPTOR_NAME);
    if generic.is_file() {
        debug!("Using generic descriptor {} for {}", generic.display(), coordinate);
        return Some(generic);
    }
    None
}

#[derive(Debug, Default)]
struct RawDependency {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    artifact_type: Option<String>,
    classifier: Option<String>,
    system_path: Option<String>,
}

#[derive(Debug, Default)]
struct RawDeclaration {
    group_id: Option<String>,
    artifact_id: Option<String>,
    has_dependencies: bool,
    dependencies: Vec<RawDependency>,
}

#[derive(Debug, Default)]
struct RawBuildPlugin {
    group_id: Option<String>,
    artifact_id: Option<String>,
    declarations: Vec<RawDeclaration>,
}

fn required(value: &Option<String>, element: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::ConfigError(format!(
            "Expecting child element with not null value {element}"
        ))),
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl RawDependency {
    fn validate(&self) -> Result<DependencyDeclaration> {
        let mut dependency = DependencyDeclaration::new(
            required(&self.group_id, "groupId")?,
            required(&self.artifact_id, "artifactId")?,
            required(&self.version, "version")?,
        );
        if let Some(artifact_type) = optional(&self.artifact_type) {
            dependency.artifact_type = artifact_type;
        }
        dependency.classifier = optional(&self.classifier);
        dependency.system_path = optional(&self.system_path).map(PathBuf::from);
        Ok(dependency)
    }
}

impl RawDeclaration {
    fn validate(&self) -> Result<PluginDeclaration> {
        let group_id = required(&self.group_id, "groupId")?;
        let artifact_id = required(&self.artifact_id, "artifactId")?;
        if !self.has_dependencies {
            return Err(Error::ConfigError(format!(
                "Expecting child element additionalDependencies for plugin {group_id}:{artifact_id}"
            )));
        }
        let additional_dependencies = self
            .dependencies
            .iter()
            .map(RawDependency::validate)
            .collect::<Result<Vec<_>>>()?;
        Ok(PluginDeclaration {
            group_id,
            artifact_id,
            additional_dependencies,
        })
    }
}

/// Event-driven scan of a descriptor keeping only what declarations need
#[derive(Default)]
struct DescriptorScanner {
    stack: Vec<String>,
    plugins: Vec<RawBuildPlugin>,
}

impl DescriptorScanner {
    fn scan(xml: &str) -> Result<Vec<RawBuildPlugin>> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut scanner = Self::default();
        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    scanner.stack.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                    scanner.open();
                }
                Event::Empty(e) => {
                    scanner.stack.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                    scanner.open();
                    scanner.stack.pop();
                }
                Event::End(_) => {
                    scanner.stack.pop();
                }
                Event::Text(t) => {
                    let text = t.unescape()?.into_owned();
                    scanner.text(text);
                }
                Event::CData(t) => {
                    let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                    scanner.text(text);
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(scanner.plugins)
    }

    fn open(&mut self) {
        let Some(rest) = relative(&self.stack) else {
            return;
        };
        if rest.is_empty() {
            self.plugins.push(RawBuildPlugin::default());
        } else if rest == DECLARATION {
            if let Some(plugin) = self.plugins.last_mut() {
                plugin.declarations.push(RawDeclaration::default());
            }
        } else if rest.len() == DECLARATION.len() + 1
            && rest.starts_with(DECLARATION)
            && rest[DECLARATION.len()] == DECLARED_DEPENDENCY[0]
        {
            if let Some(declaration) = current_declaration(&mut self.plugins) {
                declaration.has_dependencies = true;
            }
        } else if rest.len() == DECLARATION.len() + DECLARED_DEPENDENCY.len()
            && rest.starts_with(DECLARATION)
            && rest.ends_with(DECLARED_DEPENDENCY)
        {
            if let Some(declaration) = current_declaration(&mut self.plugins) {
                declaration.dependencies.push(RawDependency::default());
            }
        }
    }

    fn text(&mut self, text: String) {
        let Some(rest) = relative(&self.stack) else {
            return;
        };

        match rest.len() {
            1 => {
                if let Some(plugin) = self.plugins.last_mut() {
                    match rest[0] {
                        "groupId" => append(&mut plugin.group_id, &text),
                        "artifactId" => append(&mut plugin.artifact_id, &text),
                        _ => {}
                    }
                }
            }
            4 if rest.starts_with(DECLARATION) => {
                if let Some(declaration) = current_declaration(&mut self.plugins) {
                    match rest[3] {
                        "groupId" => append(&mut declaration.group_id, &text),
                        "artifactId" => append(&mut declaration.artifact_id, &text),
                        _ => {}
                    }
                }
            }
            6 if rest.starts_with(DECLARATION) && rest[3..5] == *DECLARED_DEPENDENCY => {
                if let Some(dependency) =
                    current_declaration(&mut self.plugins).and_then(|d| d.dependencies.last_mut())
                {
                    match rest[5] {
                        "groupId" => append(&mut dependency.group_id, &text),
                        "artifactId" => append(&mut dependency.artifact_id, &text),
                        "version" => append(&mut dependency.version, &text),
                        "type" => append(&mut dependency.artifact_type, &text),
                        "classifier" => append(&mut dependency.classifier, &text),
                        "systemPath" => append(&mut dependency.system_path, &text),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
}

/// Text of one element may arrive in several events, e.g. around a comment
fn append(value: &mut Option<String>, text: &str) {
    value.get_or_insert_with(String::new).push_str(text);
}

/// Element path below `project/build/plugins/plugin`, if inside one
fn relative(stack: &[String]) -> Option<Vec<&str>> {
    let path: Vec<&str> = stack.iter().map(String::as_str).collect();
    path.strip_prefix(BUILD_PLUGIN).map(<[&str]>::to_vec)
}

fn current_declaration(plugins: &mut [RawBuildPlugin]) -> Option<&mut RawDeclaration> {
    plugins.last_mut().and_then(|p| p.declarations.last_mut())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(packager_group: &str, packager_artifact: &str, declarations: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>org.mule.connectors</groupId>
  <artifactId>owner</artifactId>
  <version>1.0.0</version>
  <build>
    <plugins>
      <plugin>
        <groupId>org.apache.maven.plugins</groupId>
        <artifactId>maven-compiler-plugin</artifactId>
      </plugin>
      <plugin>
        <groupId>{packager_group}</groupId>
        <artifactId>{packager_artifact}</artifactId>
        <configuration>
          <additionalPluginDependencies>
            {declarations}
          </additionalPluginDependencies>
        </configuration>
      </plugin>
    </plugins>
  </build>
</project>"#
        )
    }

    const DB_DECLARATION: &str = r#"
      <plugin>
        <groupId>org.mule.connectors</groupId>
        <artifactId>mule-db-connector</artifactId>
        <additionalDependencies>
          <dependency>
            <groupId>org.postgresql</groupId>
            <artifactId>postgresql</artifactId>
            <version>42.2.5</version>
          </dependency>
          <dependency>
            <groupId>com.acme</groupId>
            <artifactId>driver</artifactId>
            <version>1.0</version>
            <type>zip</type>
            <classifier>natives</classifier>
            <systemPath>/opt/driver.zip</systemPath>
          </dependency>
        </additionalDependencies>
      </plugin>"#;

    #[test]
    fn test_parse_declarations() {
        let xml = descriptor("org.mule.tools.maven", "mule-maven-plugin", DB_DECLARATION);
        let metadata = BuildMetadata::from_descriptor_str(&xml).unwrap();

        assert_eq!(metadata.additional_plugin_dependencies.len(), 1);
        let declaration = &metadata.additional_plugin_dependencies[0];
        assert_eq!(declaration.group_id, "org.mule.connectors");
        assert_eq!(declaration.artifact_id, "mule-db-connector");
        assert_eq!(declaration.additional_dependencies.len(), 2);

        let postgres = &declaration.additional_dependencies[0];
        assert_eq!(postgres.version, "42.2.5");
        assert_eq!(postgres.artifact_type, "jar");
        assert_eq!(postgres.classifier, None);

        let driver = &declaration.additional_dependencies[1];
        assert_eq!(driver.artifact_type, "zip");
        assert_eq!(driver.classifier.as_deref(), Some("natives"));
        assert_eq!(driver.system_path, Some(PathBuf::from("/opt/driver.zip")));
    }

    #[test]
    fn test_extensions_plugin_takes_priority() {
        let other = r#"
      <plugin>
        <groupId>org.mule.connectors</groupId>
        <artifactId>mule-http-connector</artifactId>
        <additionalDependencies/>
      </plugin>"#;
        let xml = format!(
            "<project><build><plugins>\
             <plugin><groupId>org.mule.tools.maven</groupId><artifactId>mule-maven-plugin</artifactId>\
             <configuration><additionalPluginDependencies>{DB_DECLARATION}</additionalPluginDependencies></configuration></plugin>\
             <plugin><groupId>org.mule.runtime.plugins</groupId><artifactId>mule-extensions-maven-plugin</artifactId>\
             <configuration><additionalPluginDependencies>{other}</additionalPluginDependencies></configuration></plugin>\
             </plugins></build></project>"
        );
        let metadata = BuildMetadata::from_descriptor_str(&xml).unwrap();
        assert_eq!(metadata.additional_plugin_dependencies.len(), 1);
        assert_eq!(metadata.additional_plugin_dependencies[0].artifact_id, "mule-http-connector");
        assert!(metadata.additional_plugin_dependencies[0].additional_dependencies.is_empty());
    }

    #[test]
    fn test_text_split_by_comment() {
        let declaration = r#"
      <plugin>
        <groupId>org.mule.connectors</groupId>
        <artifactId>mule-db-<!-- renamed -->connector</artifactId>
        <additionalDependencies>
          <dependency>
            <groupId>org.postgresql</groupId>
            <artifactId>postgresql</artifactId>
            <version>42.<!-- pinned -->2.5</version>
          </dependency>
        </additionalDependencies>
      </plugin>"#;
        let xml = descriptor("org.mule.tools.maven", "mule-maven-plugin", declaration);
        let metadata = BuildMetadata::from_descriptor_str(&xml).unwrap();
        let declaration = &metadata.additional_plugin_dependencies[0];
        assert_eq!(declaration.artifact_id, "mule-db-connector");
        assert_eq!(declaration.additional_dependencies[0].version, "42.2.5");
    }

    #[test]
    fn test_no_packager_plugin() {
        let xml = "<project><build><plugins><plugin><groupId>x</groupId><artifactId>y</artifactId></plugin></plugins></build></project>";
        assert!(BuildMetadata::from_descriptor_str(xml).unwrap().is_empty());
        assert!(BuildMetadata::from_descriptor_str("<project/>").unwrap().is_empty());
    }

    #[test]
    fn test_missing_version_is_config_error() {
        let declaration = r#"
      <plugin>
        <groupId>org.mule.connectors</groupId>
        <artifactId>mule-db-connector</artifactId>
        <additionalDependencies>
          <dependency>
            <groupId>org.postgresql</groupId>
            <artifactId>postgresql</artifactId>
          </dependency>
        </additionalDependencies>
      </plugin>"#;
        let xml = descriptor("org.mule.tools.maven", "mule-maven-plugin", declaration);
        let err = BuildMetadata::from_descriptor_str(&xml).unwrap_err();
        assert!(matches!(err, Error::ConfigError(ref msg) if msg.contains("version")));
    }

    #[test]
    fn test_missing_dependencies_block_is_config_error() {
        let declaration = r#"
      <plugin>
        <groupId>org.mule.connectors</groupId>
        <artifactId>mule-db-connector</artifactId>
      </plugin>"#;
        let xml = descriptor("org.mule.tools.maven", "mule-maven-plugin", declaration);
        assert!(matches!(
            BuildMetadata::from_descriptor_str(&xml),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_locate_descriptor_prefers_named() {
        let dir = tempfile::tempdir().unwrap();
        let coordinate = ArtifactCoordinate::new("g", "lib", "1.0.0");
        let bundle = dir.path().join("lib-1.0.0.jar");
        fs::write(&bundle, b"payload").unwrap();

        assert_eq!(locate_descriptor(&bundle, &coordinate), None);

        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        assert_eq!(locate_descriptor(&bundle, &coordinate), Some(dir.path().join("pom.xml")));

        fs::write(dir.path().join("lib-1.0.0.pom"), "<project/>").unwrap();
        assert_eq!(
            locate_descriptor(&bundle, &coordinate),
            Some(dir.path().join("lib-1.0.0.pom"))
        );
    }
}
