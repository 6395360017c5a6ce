//! Project detection
//!
//! Marker-file classification, manifest inspection, and a bounded file scan.
//! Everything here is read-only and best-effort: unreadable files are skipped.

use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// Manifest filename → project label, in display order
pub const PROJECT_MARKERS: &[(&str, &str)] = &[
    ("go.mod", "Go"),
    ("go.sum", "Go"),
    ("package.json", "Node.js"),
    ("pom.xml", "Java (Maven)"),
    ("build.gradle", "Java (Gradle)"),
    ("Cargo.toml", "Rust"),
    ("pyproject.toml", "Python"),
    ("requirements.txt", "Python"),
    ("composer.json", "PHP"),
    ("Gemfile", "Ruby"),
    ("CMakeLists.txt", "C/C++ (CMake)"),
    ("Makefile", "Make"),
    ("Dockerfile", "Docker"),
    ("docker-compose.yml", "Docker Compose"),
];

/// Directories never descended into when scanning
pub const SKIP_DIRS: &[&str] = &["node_modules", "vendor", "target", "build", "dist"];

/// Default cap for [`scan_files`]
pub const MAX_SCANNED_FILES: usize = 100;

/// Labels for every marker present in `dir`, deduplicated
pub fn detect_project_kinds(dir: &Path) -> Vec<&'static str> {
    let mut kinds: Vec<&'static str> = Vec::new();
    for (marker, label) in PROJECT_MARKERS {
        if dir.join(marker).is_file() && !kinds.contains(label) {
            kinds.push(*label);
        }
    }
    kinds
}

/// Human label such as `"Rust + Docker"`, or `"Generic Directory"`
pub fn project_kind_label(dir: &Path) -> String {
    let kinds = detect_project_kinds(dir);
    if kinds.is_empty() {
        "Generic Directory".to_string()
    } else {
        kinds.join(" + ")
    }
}

/// Project snapshot embedded in a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub framework: String,
    #[serde(default)]
    pub description: String,
    /// Relative paths, capped at [`MAX_SCANNED_FILES`]
    #[serde(default)]
    pub files: Vec<String>,
    /// True when the scan stopped at the cap
    #[serde(default)]
    pub files_truncated: bool,
}

/// Inspect manifests in `dir` and list its files
pub fn analyze_project(dir: &Path) -> ProjectInfo {
    let mut info = ProjectInfo {
        name: dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        ..Default::default()
    };

    if let Ok(content) = std::fs::read_to_string(dir.join("go.mod")) {
        info.language = "Go".to_string();
        if let Some(module) = go_module_name(&content) {
            info.name = module;
        }
    } else if let Ok(content) = std::fs::read_to_string(dir.join("Cargo.toml")) {
        info.language = "Rust".to_string();
        if let Some((name, description)) = cargo_package(&content) {
            info.name = name;
            info.description = description.unwrap_or_default();
        }
    } else if let Ok(content) = std::fs::read_to_string(dir.join("package.json")) {
        info.language = if dir.join("tsconfig.json").is_file() {
            "TypeScript".to_string()
        } else {
            "JavaScript".to_string()
        };
        if let Ok(package) = serde_json::from_str::<serde_json::Value>(&content) {
            if let Some(name) = package["name"].as_str() {
                info.name = name.to_string();
            }
            if let Some(description) = package["description"].as_str() {
                info.description = description.to_string();
            }
            info.framework = js_framework(&package).unwrap_or_default().to_string();
        }
    } else if dir.join("pyproject.toml").is_file() || dir.join("requirements.txt").is_file() {
        info.language = "Python".to_string();
    } else if let Some(label) = detect_project_kinds(dir).first() {
        info.language = label.to_string();
    }

    let (files, truncated) = scan_files(dir, MAX_SCANNED_FILES);
    info.files = files;
    info.files_truncated = truncated;
    info
}

fn go_module_name(go_mod: &str) -> Option<String> {
    go_mod
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("module "))
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

fn cargo_package(manifest: &str) -> Option<(String, Option<String>)> {
    let value: toml::Value = toml::from_str(manifest).ok()?;
    let package = value.get("package")?;
    let name = package.get("name")?.as_str()?.to_string();
    let description = package
        .get("description")
        .and_then(|d| d.as_str())
        .map(str::to_string);
    Some((name, description))
}

fn js_framework(package: &serde_json::Value) -> Option<&'static str> {
    const FRAMEWORKS: &[(&str, &str)] = &[("react", "React"), ("vue", "Vue"), ("@angular/core", "Angular")];
    let has_dep = |dep: &str| {
        ["dependencies", "devDependencies"]
            .iter()
            .any(|section| package[section].get(dep).is_some())
    };
    FRAMEWORKS
        .iter()
        .find(|(dep, _)| has_dep(*dep))
        .map(|(_, label)| *label)
}

/// Dependency and manifest highlights for the manifests present in `dir`
pub fn dependency_summary(dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    if let Ok(content) = std::fs::read_to_string(dir.join("go.mod")) {
        lines.push("Go (go.mod):".to_string());
        for line in content.lines().map(str::trim) {
            if let Some(module) = line.strip_prefix("module ") {
                lines.push(format!("  Module: {}", module.trim()));
            } else if let Some(version) = line.strip_prefix("go ") {
                lines.push(format!("  Go Version: {}", version.trim()));
            } else if line.starts_with("require") && !line.contains("//") {
                lines.push(format!("  {}", line));
            }
        }
    }

    if let Ok(content) = std::fs::read_to_string(dir.join("Cargo.toml")) {
        if let Ok(manifest) = toml::from_str::<toml::Value>(&content) {
            lines.push("Rust (Cargo.toml):".to_string());
            if let Some(package) = manifest.get("package") {
                if let Some(name) = package.get("name").and_then(|v| v.as_str()) {
                    lines.push(format!("  Package: {}", name));
                }
                if let Some(version) = package.get("version").and_then(|v| v.as_str()) {
                    lines.push(format!("  Version: {}", version));
                }
            }
            if let Some(members) = manifest
                .get("workspace")
                .and_then(|w| w.get("members"))
                .and_then(|m| m.as_array())
            {
                lines.push(format!("  Workspace members: {}", members.len()));
            }
            if let Some(deps) = manifest.get("dependencies").and_then(|d| d.as_table()) {
                let names: Vec<&str> = deps.keys().map(String::as_str).collect();
                lines.push(format!("  Dependencies ({}): {}", names.len(), names.join(", ")));
            }
        }
    }

    if let Ok(content) = std::fs::read_to_string(dir.join("package.json")) {
        if let Ok(package) = serde_json::from_str::<serde_json::Value>(&content) {
            lines.push("Node.js (package.json):".to_string());
            if let Some(name) = package["name"].as_str() {
                lines.push(format!("  Package: {}", name));
            }
            if let Some(version) = package["version"].as_str() {
                lines.push(format!("  Version: {}", version));
            }
            if let Some(scripts) = package["scripts"].as_object() {
                lines.push("  Available Scripts:".to_string());
                for script in scripts.keys() {
                    lines.push(format!("    - npm run {}", script));
                }
            }
        }
    }

    lines
}

/// Relative file paths under `dir`, skipping hidden entries and [`SKIP_DIRS`].
///
/// Returns at most `cap` paths (sorted walk order) and whether more existed.
pub fn scan_files(dir: &Path, cap: usize) -> (Vec<String>, bool) {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e));

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        if files.len() >= cap {
            return (files, true);
        }
        if let Ok(rel) = entry.path().strip_prefix(dir) {
            files.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
    (files, false)
}

/// Hidden entries and dependency/build directories
pub fn is_ignored(entry: &walkdir::DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && SKIP_DIRS.iter().any(|d| *d == name))
}

/// Short description of a well-known top-level directory
pub fn classify_directory(name: &str) -> &'static str {
    match name.to_lowercase().as_str() {
        "src" => "Source code",
        "internal" => "Internal packages",
        "pkg" => "Packages",
        "cmd" => "Command entry points",
        "crates" => "Workspace crates",
        "api" => "API definitions",
        "web" | "static" => "Web assets",
        "templates" => "Templates",
        "config" => "Configuration",
        "docs" => "Documentation",
        "test" | "tests" => "Tests",
        "benches" => "Benchmarks",
        "build" | "dist" | "target" => "Build output",
        "vendor" | "node_modules" => "Dependencies",
        "bin" => "Binaries",
        "scripts" | "tools" => "Scripts and tooling",
        "examples" => "Examples",
        "frontend" => "Frontend code",
        "backend" => "Backend code",
        _ => "Project directory",
    }
}

/// Short description of a notable file, or `None` for ordinary files
pub fn classify_file(name: &str) -> Option<&'static str> {
    let by_name = match name {
        "go.mod" => Some("Go module definition"),
        "go.sum" => Some("Go module checksums"),
        "Cargo.toml" => Some("Rust package manifest"),
        "Cargo.lock" => Some("Rust lock file"),
        "package.json" => Some("Node.js package definition"),
        "package-lock.json" => Some("Node.js lock file"),
        "tsconfig.json" => Some("TypeScript configuration"),
        "pom.xml" => Some("Maven build configuration"),
        "build.gradle" => Some("Gradle build configuration"),
        "pyproject.toml" => Some("Python project configuration"),
        "requirements.txt" => Some("Python requirements"),
        "Dockerfile" => Some("Docker container definition"),
        "docker-compose.yml" => Some("Docker Compose configuration"),
        "Makefile" => Some("Build automation"),
        "README.md" => Some("Project documentation"),
        "LICENSE" => Some("License"),
        ".gitignore" => Some("Git ignore rules"),
        ".env" => Some("Environment variables"),
        "main.go" => Some("Go entry point"),
        "main.py" => Some("Python entry point"),
        "index.js" => Some("JavaScript entry point"),
        "index.html" => Some("HTML entry point"),
        _ => None,
    };
    if by_name.is_some() {
        return by_name;
    }

    let ext = Path::new(name).extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "rs" => Some("Rust source"),
        "go" => Some("Go source"),
        "py" => Some("Python source"),
        "js" => Some("JavaScript source"),
        "ts" => Some("TypeScript source"),
        "java" => Some("Java source"),
        "c" | "cpp" => Some("C/C++ source"),
        "h" | "hpp" => Some("Header"),
        "md" => Some("Markdown"),
        "yml" | "yaml" => Some("YAML configuration"),
        "toml" => Some("TOML configuration"),
        "json" => Some("JSON data"),
        "sh" | "bat" => Some("Script"),
        "sql" => Some("SQL script"),
        _ => None,
    }
}

/// Conventional commands for the detected project kinds
pub fn project_suggestions(dir: &Path, kinds: &[&str]) -> Vec<String> {
    let mut suggestions = Vec::new();
    let has = |needle: &str| kinds.iter().any(|k| k.contains(needle));

    if has("Rust") {
        suggestions.push("Use 'cargo build' to compile and 'cargo test' to run the tests".to_string());
    }
    if has("Go") {
        suggestions.push("Use 'go build' to compile and 'go mod tidy' to clean up dependencies".to_string());
    }
    if has("Node.js") {
        suggestions.push("Use 'npm install' to install dependencies; package.json lists the scripts".to_string());
    }
    if has("Java") {
        suggestions.push("Use 'mvn compile' or 'gradle build' to build".to_string());
    }
    if has("Python") {
        suggestions.push("Install dependencies with 'pip install -r requirements.txt' or the pyproject tooling".to_string());
    }
    if dir.join("README.md").is_file() {
        suggestions.push("Read README.md for project documentation".to_string());
    }
    if dir.join("Makefile").is_file() {
        suggestions.push("Use 'make' targets for build automation".to_string());
    }
    if dir.join("docker-compose.yml").is_file() {
        suggestions.push("Use 'docker-compose up' to start services".to_string());
    }
    suggestions
}
