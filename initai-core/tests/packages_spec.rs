use std::fs;
use std::io::{self, Cursor, Read};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use initai_core::archive::{assemble, assemble_at};
use initai_core::*;
use speculate2::speculate;
use tempfile::TempDir;

/// A package tree on disk, removed when dropped.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn file(&self, path: &str, content: &str) -> &Self {
        let full = self.dir.path().join(path);
        fs::create_dir_all(full.parent().expect("path has a parent")).expect("Failed to mkdir");
        fs::write(full, content).expect("Failed to write fixture file");
        self
    }

    fn dir(&self, path: &str) -> &Self {
        fs::create_dir_all(self.dir.path().join(path)).expect("Failed to mkdir");
        self
    }

    fn library(&self) -> PackageLibrary {
        PackageLibrary::open(self.dir.path())
    }
}

/// Store wrapper counting every call that reaches the file system.
struct CountingStore {
    inner: FsStore,
    calls: Arc<AtomicUsize>,
}

impl CountingStore {
    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl PackageStore for CountingStore {
    fn dir_exists(&self, path: &Path) -> bool {
        self.tick();
        self.inner.dir_exists(path)
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.tick();
        self.inner.file_exists(path)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<StoreEntry>> {
        self.tick();
        self.inner.list_dir(path)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.tick();
        self.inner.read_file(path)
    }
}

/// Store that lists the real tree but cannot read any file.
struct UnreadableStore {
    inner: FsStore,
}

impl PackageStore for UnreadableStore {
    fn dir_exists(&self, path: &Path) -> bool {
        self.inner.dir_exists(path)
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.inner.file_exists(path)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<StoreEntry>> {
        self.inner.list_dir(path)
    }

    fn read_file(&self, _path: &Path) -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read refused"))
    }
}

/// Every entry of a zip as (name, content), in archive order.
fn unzip(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("Invalid zip");
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).expect("Missing entry");
            let mut content = Vec::new();
            entry.read_to_end(&mut content).expect("Unreadable entry");
            (entry.name().to_string(), content)
        })
        .collect()
}

fn manifest_of(bytes: &[u8]) -> Manifest {
    let (name, content) = unzip(bytes).into_iter().next().expect("Empty archive");
    assert_eq!(name, "manifest.json");
    serde_json::from_slice(&content).expect("manifest.json is not valid JSON")
}

fn node(framework: &str, scope: &str, llm: &str) -> PackageNode {
    PackageNode::new("shared", framework, scope, llm)
}

speculate! {
    before {
        let fixture = Fixture::new();
        fixture
            .file("shared/bliss/backend/manifest.json", "{}")
            .file("shared/bliss/backend/init.md", "universal init")
            .file("shared/bliss/backend/release.zip", "PK")
            .file("shared/bliss/backend/claude/manifest.json", "{\"version\": \"1.0.0\"}")
            .file("shared/bliss/backend/claude/init.md", "hello")
            .file("shared/bliss/backend/claude/nested/deep.md", "not packaged")
            .file("shared/bliss/backend/scratch/notes.md", "no marker here")
            .file("shared/bliss/frontend/readme.md", "scope without marker")
            .dir("shared/bliss/fullstack")
            .dir("shared/hollow/backend/claude");
        let library = fixture.library();
    }

    describe "tree scanner" {
        it "lists frameworks in name order" {
            assert_eq!(library.list_frameworks("shared"), vec!["bliss", "hollow"]);
        }

        it "lists scopes of a framework" {
            assert_eq!(
                library.list_scopes("shared", "bliss"),
                vec!["backend", "frontend", "fullstack"]
            );
        }

        it "returns empty lists for missing directories" {
            assert!(library.list_scopes("shared", "missing").is_empty());
            assert!(library.list_variants("shared", "bliss", "missing").is_empty());
        }

        it "only lists variants with a manifest marker" {
            assert_eq!(
                library.list_variants("shared", "bliss", "backend"),
                vec!["universal", "claude"]
            );
            assert!(library.list_variants("shared", "bliss", "frontend").is_empty());
        }

        it "lists nothing for a foreign tenant" {
            assert!(library.list_frameworks("other-tenant").is_empty());
            assert!(library.list_scopes("other-tenant", "bliss").is_empty());
        }
    }

    describe "catalog builder" {
        it "drops empty scopes and frameworks" {
            let catalog = library.build_catalog("shared").expect("Catalog failed");

            assert_eq!(catalog.tenant, "shared");
            assert_eq!(catalog.frameworks.len(), 1);
            let bliss = catalog.framework("bliss").expect("bliss missing");
            assert_eq!(bliss.scopes.len(), 1);
            assert!(bliss.scope("frontend").is_none());
            assert!(catalog.framework("hollow").is_none());
        }

        it "builds download urls per variant" {
            let catalog = library.build_catalog("shared").expect("Catalog failed");
            let backend = catalog.frameworks[0].scope("backend").expect("backend missing");

            let universal = backend.variant("universal").expect("universal missing");
            assert_eq!(universal.download_url, "/init/shared/bliss/backend");
            assert_eq!(universal.description, "Works with any LLM");

            let claude = backend.variant("claude").expect("claude missing");
            assert_eq!(claude.download_url, "/init/shared/bliss/backend/claude");
            assert_eq!(backend.description, "Server-side development, APIs, databases");
        }

        it "is stable across repeated calls" {
            let first = library.build_catalog("shared").expect("Catalog failed");
            let second = library.build_catalog("shared").expect("Catalog failed");
            assert_eq!(first, second);
        }

        it "rejects an unknown tenant" {
            let err = library.build_catalog("other-tenant").unwrap_err();
            assert!(matches!(err, PackageError::InvalidTenant(ref t) if t == "other-tenant"));
        }

        it "returns an empty catalog for an empty tree" {
            let empty = Fixture::new();
            let catalog = empty.library().build_catalog("shared").expect("Catalog failed");
            assert!(catalog.is_empty());
        }

        it "advertises a new llm folder without code changes" {
            fixture.file("shared/bliss/backend/mistral/manifest.json", "{}");
            let catalog = library.build_catalog("shared").expect("Catalog failed");
            let backend = catalog.frameworks[0].scope("backend").expect("backend missing");
            let mistral = backend.variant("mistral").expect("mistral missing");
            assert_eq!(mistral.description, "Optimized for mistral");
        }
    }

    describe "package resolver" {
        it "returns exactly the packageable universal files" {
            let files = library.resolve(&node("bliss", "backend", "universal")).expect("Resolve failed");
            assert_eq!(files.resolved_variant, "universal");
            assert_eq!(files.names(), vec!["init.md", "manifest.json"]);
            assert_eq!(files.files[0].content, b"universal init");
            assert_eq!(files.files[0].relative_path, "bliss/backend/init.md");
        }

        it "prefers the llm-specific directory" {
            let files = library.resolve(&node("bliss", "backend", "claude")).expect("Resolve failed");
            assert_eq!(files.resolved_variant, "claude");
            assert_eq!(files.names(), vec!["init.md", "manifest.json"]);
            assert_eq!(files.files[0].content, b"hello");
        }

        it "falls back to universal for an unknown llm" {
            let files = library.resolve(&node("bliss", "backend", "gemini")).expect("Resolve failed");
            assert_eq!(files.resolved_variant, "universal");
            assert_eq!(files.files[0].content, b"universal init");
        }

        it "reports a missing combination as not found" {
            let err = library.resolve(&node("bliss", "mobile", "gemini")).unwrap_err();
            assert!(matches!(err, PackageError::NotFound(_)));

            let err = library.resolve(&node("missing", "backend", "universal")).unwrap_err();
            assert!(matches!(err, PackageError::NotFound(_)));
        }

        it "reports a directory without files as empty" {
            let err = library.resolve(&node("bliss", "fullstack", "universal")).unwrap_err();
            assert!(matches!(err, PackageError::Empty(_)));

            let err = library.resolve(&node("hollow", "backend", "claude")).unwrap_err();
            assert!(matches!(err, PackageError::Empty(_)));
        }

        it "treats a directory of only archives as empty" {
            fixture.file("shared/zipped/backend/bundle.zip", "PK");
            let err = library.resolve(&node("zipped", "backend", "universal")).unwrap_err();
            assert!(matches!(err, PackageError::Empty(_)));
        }

        it "refuses path traversal segments" {
            fixture.file("secret.txt", "top secret");
            let err = library.resolve(&node("..", "..", "universal")).unwrap_err();
            assert!(matches!(err, PackageError::NotFound(_)));
        }

        it "rejects a foreign tenant without touching the file system" {
            let calls = Arc::new(AtomicUsize::new(0));
            let store = CountingStore {
                inner: FsStore::new(fixture.dir.path()),
                calls: Arc::clone(&calls),
            };
            let counted = PackageLibrary::new(Arc::new(store), "shared");

            let err = counted
                .resolve(&PackageNode::new("other-tenant", "bliss", "backend", "claude"))
                .unwrap_err();
            assert!(matches!(err, PackageError::InvalidTenant(_)));
            assert!(counted.build_catalog("other-tenant").is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 0);

            counted.resolve(&node("bliss", "backend", "claude")).expect("Resolve failed");
            assert!(calls.load(Ordering::SeqCst) > 0);
        }
    }

    describe "archive assembler" {
        it "writes the generated manifest first and every file after it" {
            let request = node("bliss", "backend", "claude");
            let files = library.resolve(&request).expect("Resolve failed");
            let bytes = assemble(&request, &files).expect("Assemble failed");

            let entries = unzip(&bytes);
            let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
            assert_eq!(names, vec!["manifest.json", "init.md", "manifest.json"]);
            assert_eq!(entries[1].1, b"hello");
            assert_eq!(entries[2].1, b"{\"version\": \"1.0.0\"}");
        }

        it "describes each file with its byte size" {
            let request = node("bliss", "backend", "claude");
            let files = library.resolve(&request).expect("Resolve failed");
            let manifest = manifest_of(&assemble(&request, &files).expect("Assemble failed"));

            assert_eq!(manifest.tenant, "shared");
            assert_eq!(manifest.framework, "bliss");
            assert_eq!(manifest.scope, "backend");
            assert_eq!(manifest.llm, "claude");
            let sizes: Vec<(&str, u64)> =
                manifest.files.iter().map(|f| (f.name.as_str(), f.size)).collect();
            assert_eq!(sizes, vec![("init.md", 5), ("manifest.json", 20)]);
            assert_eq!(manifest.metadata.description, "bliss backend development for claude");
        }

        it "differs only in created_at between builds" {
            let request = node("bliss", "backend", "universal");
            let files = library.resolve(&request).expect("Resolve failed");

            let early = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
            let late = Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap();
            let mut first = manifest_of(&assemble_at(&request, &files, early).expect("Assemble failed"));
            let second = manifest_of(&assemble_at(&request, &files, late).expect("Assemble failed"));

            assert_ne!(first.created_at, second.created_at);
            first.created_at = second.created_at;
            assert_eq!(first, second);
        }

        it "names the archive after the requested node" {
            let archive = library
                .download(&node("bliss", "backend", "gemini"))
                .expect("Download failed");
            assert_eq!(archive.filename, "bliss-backend-gemini-init.zip");
            let manifest = manifest_of(&archive.bytes);
            assert_eq!(manifest.llm, "gemini");
            assert_eq!(manifest.files[0].path, "bliss/backend/init.md");
        }

        it "fails the whole download when a file cannot be read" {
            let unreadable = PackageLibrary::new(
                Arc::new(UnreadableStore { inner: FsStore::new(fixture.dir.path()) }),
                "shared",
            );

            let reason = match unreadable.download(&node("bliss", "backend", "claude")) {
                Err(PackageError::Assembly(reason)) => reason,
                Err(other) => panic!("expected an assembly failure, got {:?}", other),
                Ok(archive) => panic!("expected no archive, got {} bytes", archive.bytes.len()),
            };
            assert!(reason.contains("init.md"));
            assert!(reason.contains("read refused"));
        }

        it "surfaces resolution errors from download" {
            let err = library.download(&node("bliss", "fullstack", "universal")).unwrap_err();
            assert_eq!(err.kind(), "empty");
        }
    }
}
