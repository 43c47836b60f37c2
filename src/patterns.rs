//! Detection pattern library: per-language catalogs of regexes that
//! indicate file input, file output, or a dependency construct.
//!
//! Purely declarative data consumed by the auto-detector. Adding a
//! language is a data change only: append a table and register it in
//! `raw_entries`. TypeScript's lists are a strict superset of
//! JavaScript's, and C++'s a superset of C's, by composition.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{PutError, Result};

/// One detection pattern: a line regex, the display name of the
/// construct it matches, and a short description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetectionPattern {
    pub regex: &'static str,
    pub func: &'static str,
    pub description: &'static str,
}

/// The three pattern categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    Input,
    Output,
    Dependency,
}

impl PatternCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternCategory::Input => "input",
            PatternCategory::Output => "output",
            PatternCategory::Dependency => "dependency",
        }
    }
}

impl FromStr for PatternCategory {
    type Err = PutError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "input" => Ok(PatternCategory::Input),
            "output" => Ok(PatternCategory::Output),
            "dependency" => Ok(PatternCategory::Dependency),
            other => Err(PutError::Pattern {
                message: format!(
                    "unknown pattern category '{}' (expected input, output, or dependency)",
                    other
                ),
            }),
        }
    }
}

macro_rules! pat {
    ($regex:expr, $func:expr, $desc:expr) => {
        DetectionPattern {
            regex: $regex,
            func: $func,
            description: $desc,
        }
    };
}

const R_INPUT: &[DetectionPattern] = &[
    pat!(r"\bread\.csv\s*\(", "read.csv", "read a CSV file"),
    pat!(r"\bread\.table\s*\(", "read.table", "read a delimited table"),
    pat!(r"\bread_csv\s*\(", "read_csv", "readr CSV import"),
    pat!(r"\bread_tsv\s*\(", "read_tsv", "readr TSV import"),
    pat!(r"\bread_excel\s*\(", "read_excel", "readxl spreadsheet import"),
    pat!(r"\breadRDS\s*\(", "readRDS", "read a serialized R object"),
    pat!(r"\bfread\s*\(", "fread", "data.table fast import"),
    pat!(r"\bload\s*\(", "load", "load a saved R workspace"),
    pat!(r"\breadLines\s*\(", "readLines", "read raw text lines"),
];

const R_OUTPUT: &[DetectionPattern] = &[
    pat!(r"\bwrite\.csv\s*\(", "write.csv", "write a CSV file"),
    pat!(r"\bwrite\.table\s*\(", "write.table", "write a delimited table"),
    pat!(r"\bwrite_csv\s*\(", "write_csv", "readr CSV export"),
    pat!(r"\bsaveRDS\s*\(", "saveRDS", "serialize an R object"),
    pat!(r"\bfwrite\s*\(", "fwrite", "data.table fast export"),
    pat!(r"\bggsave\s*\(", "ggsave", "save a ggplot figure"),
    pat!(r"\bsave\s*\(", "save", "save R objects to a file"),
    pat!(r"\bwriteLines\s*\(", "writeLines", "write raw text lines"),
];

const R_DEPENDENCY: &[DetectionPattern] = &[
    pat!(r"\blibrary\s*\(", "library", "attach a package"),
    pat!(r"\brequire\s*\(", "require", "attach a package"),
    pat!(r"\bsource\s*\(", "source", "execute another R script"),
];

const PYTHON_INPUT: &[DetectionPattern] = &[
    pat!(r"\bpd\.read_csv\s*\(", "pd.read_csv", "pandas CSV import"),
    pat!(r"\bpd\.read_parquet\s*\(", "pd.read_parquet", "pandas parquet import"),
    pat!(r"\bpd\.read_json\s*\(", "pd.read_json", "pandas JSON import"),
    pat!(r"\bpd\.read_excel\s*\(", "pd.read_excel", "pandas spreadsheet import"),
    pat!(r"\bnp\.load\s*\(", "np.load", "numpy array import"),
    pat!(r"\bjson\.load\s*\(", "json.load", "JSON deserialization"),
    pat!(r"\bpickle\.load\s*\(", "pickle.load", "pickle deserialization"),
    pat!(
        r#"\bopen\s*\([^)]*['"]r[bt]?['"]"#,
        "open",
        "open a file for reading"
    ),
];

const PYTHON_OUTPUT: &[DetectionPattern] = &[
    pat!(r"\.to_csv\s*\(", "to_csv", "pandas CSV export"),
    pat!(r"\.to_parquet\s*\(", "to_parquet", "pandas parquet export"),
    pat!(r"\.to_json\s*\(", "to_json", "pandas JSON export"),
    pat!(r"\bnp\.save\s*\(", "np.save", "numpy array export"),
    pat!(r"\bjson\.dump\s*\(", "json.dump", "JSON serialization"),
    pat!(r"\bpickle\.dump\s*\(", "pickle.dump", "pickle serialization"),
    pat!(r"\.savefig\s*\(", "savefig", "matplotlib figure export"),
    pat!(
        r#"\bopen\s*\([^)]*['"][wa][bt]?['"]"#,
        "open",
        "open a file for writing"
    ),
];

const PYTHON_DEPENDENCY: &[DetectionPattern] = &[
    pat!(r"^\s*import\s+\w", "import", "module import"),
    pat!(r"^\s*from\s+\w[\w.]*\s+import\b", "from import", "module import"),
];

const SQL_INPUT: &[DetectionPattern] = &[
    pat!(r"(?i)\bCOPY\b.*\bFROM\b", "COPY FROM", "bulk load from a file"),
    pat!(
        r"(?i)\bLOAD\s+DATA\b.*\bINFILE\b",
        "LOAD DATA INFILE",
        "MySQL bulk load"
    ),
    pat!(r"(?i)\bread_csv\s*\(", "read_csv", "DuckDB CSV table function"),
];

const SQL_OUTPUT: &[DetectionPattern] = &[
    pat!(r"(?i)\bCOPY\b.*\bTO\b", "COPY TO", "bulk export to a file"),
    pat!(
        r"(?i)\bINTO\s+OUTFILE\b",
        "INTO OUTFILE",
        "MySQL bulk export"
    ),
];

const SQL_DEPENDENCY: &[DetectionPattern] = &[
    pat!(r"(?i)^\s*\\i\s", "\\i", "psql script include"),
    pat!(r"(?i)^\s*USE\s+\w", "USE", "database selection"),
];

const SHELL_INPUT: &[DetectionPattern] = &[
    pat!(r"\bcat\s+", "cat", "read file contents"),
    pat!(r"<\s*[\w./~-]", "redirect", "stdin redirection"),
    pat!(r"\bcurl\s+-[sO]", "curl", "download a resource"),
];

const SHELL_OUTPUT: &[DetectionPattern] = &[
    pat!(r">>?\s*[\w./~'\x22-]", "redirect", "stdout redirection"),
    pat!(r"\btee\s+", "tee", "duplicate output to a file"),
];

const SHELL_DEPENDENCY: &[DetectionPattern] = &[
    pat!(r"^\s*source\s+", "source", "execute another script"),
    pat!(r"^\s*\.\s+[\w./~-]", ".", "execute another script"),
];

const JULIA_INPUT: &[DetectionPattern] = &[
    pat!(r"\bCSV\.read\s*\(", "CSV.read", "CSV.jl import"),
    pat!(r"\breaddlm\s*\(", "readdlm", "delimited file import"),
    pat!(r"\bJLD2?\.load\s*\(", "JLD.load", "JLD archive import"),
    pat!(r#"\bopen\s*\([^)]*['"]r['"]"#, "open", "open a file for reading"),
];

const JULIA_OUTPUT: &[DetectionPattern] = &[
    pat!(r"\bCSV\.write\s*\(", "CSV.write", "CSV.jl export"),
    pat!(r"\bwritedlm\s*\(", "writedlm", "delimited file export"),
    pat!(r"\bsavefig\s*\(", "savefig", "Plots.jl figure export"),
    pat!(r#"\bopen\s*\([^)]*['"][wa]['"]"#, "open", "open a file for writing"),
];

const JULIA_DEPENDENCY: &[DetectionPattern] = &[
    pat!(r"^\s*using\s+\w", "using", "package import"),
    pat!(r"^\s*import\s+\w", "import", "package import"),
    pat!(r"\binclude\s*\(", "include", "source another Julia file"),
];

const JS_INPUT: &[DetectionPattern] = &[
    pat!(r"\breadFileSync\s*\(", "readFileSync", "synchronous file read"),
    pat!(r"\breadFile\s*\(", "readFile", "asynchronous file read"),
    pat!(r"\bcreateReadStream\s*\(", "createReadStream", "streaming file read"),
    pat!(r"\bfetch\s*\(", "fetch", "network resource fetch"),
];

const JS_OUTPUT: &[DetectionPattern] = &[
    pat!(r"\bwriteFileSync\s*\(", "writeFileSync", "synchronous file write"),
    pat!(r"\bwriteFile\s*\(", "writeFile", "asynchronous file write"),
    pat!(
        r"\bcreateWriteStream\s*\(",
        "createWriteStream",
        "streaming file write"
    ),
    pat!(r"\bappendFileSync?\s*\(", "appendFile", "file append"),
];

const JS_DEPENDENCY: &[DetectionPattern] = &[
    pat!(r"\brequire\s*\(", "require", "CommonJS module import"),
    pat!(r"^\s*import\s", "import", "ES module import"),
];

// TypeScript-only additions layered on top of the JavaScript lists.
const TS_EXTRA_INPUT: &[DetectionPattern] = &[
    pat!(r"\bhttp\.get(<[^>]*>)?\s*\(", "http.get", "Angular HttpClient fetch"),
    pat!(r"\baxios\.get\s*\(", "axios.get", "axios HTTP fetch"),
];

const TS_EXTRA_OUTPUT: &[DetectionPattern] = &[
    pat!(r"\baxios\.(post|put)\s*\(", "axios.post", "axios HTTP upload"),
];

const TS_EXTRA_DEPENDENCY: &[DetectionPattern] = &[
    pat!(r"^\s*import\s+type\s", "import type", "type-only import"),
];

const GO_INPUT: &[DetectionPattern] = &[
    pat!(r"\bos\.Open\s*\(", "os.Open", "open a file for reading"),
    pat!(r"\bos\.ReadFile\s*\(", "os.ReadFile", "whole-file read"),
    pat!(r"\bioutil\.ReadFile\s*\(", "ioutil.ReadFile", "whole-file read"),
];

const GO_OUTPUT: &[DetectionPattern] = &[
    pat!(r"\bos\.Create\s*\(", "os.Create", "create a file for writing"),
    pat!(r"\bos\.WriteFile\s*\(", "os.WriteFile", "whole-file write"),
    pat!(r"\bioutil\.WriteFile\s*\(", "ioutil.WriteFile", "whole-file write"),
];

const GO_DEPENDENCY: &[DetectionPattern] = &[pat!(r"^\s*import\b", "import", "package import")];

const RUST_INPUT: &[DetectionPattern] = &[
    pat!(r"\bFile::open\s*\(", "File::open", "open a file for reading"),
    pat!(
        r"\bfs::read_to_string\s*\(",
        "fs::read_to_string",
        "whole-file read into a string"
    ),
    pat!(r"\bfs::read\s*\(", "fs::read", "whole-file read into bytes"),
];

const RUST_OUTPUT: &[DetectionPattern] = &[
    pat!(r"\bFile::create\s*\(", "File::create", "create a file for writing"),
    pat!(r"\bfs::write\s*\(", "fs::write", "whole-file write"),
];

const RUST_DEPENDENCY: &[DetectionPattern] = &[
    pat!(r"^\s*use\s+\w", "use", "path import"),
    pat!(r"^\s*mod\s+\w", "mod", "module declaration"),
];

const JAVA_INPUT: &[DetectionPattern] = &[
    pat!(r"new\s+FileReader\s*\(", "FileReader", "character file read"),
    pat!(r"new\s+FileInputStream\s*\(", "FileInputStream", "byte file read"),
    pat!(
        r"\bFiles\.read(AllLines|AllBytes|String)\s*\(",
        "Files.read*",
        "NIO whole-file read"
    ),
];

const JAVA_OUTPUT: &[DetectionPattern] = &[
    pat!(r"new\s+FileWriter\s*\(", "FileWriter", "character file write"),
    pat!(r"new\s+FileOutputStream\s*\(", "FileOutputStream", "byte file write"),
    pat!(r"\bFiles\.write(String)?\s*\(", "Files.write", "NIO whole-file write"),
    pat!(r"new\s+PrintWriter\s*\(", "PrintWriter", "formatted file write"),
];

const JAVA_DEPENDENCY: &[DetectionPattern] =
    &[pat!(r"^\s*import\s+[\w.]+;", "import", "class import")];

const C_INPUT: &[DetectionPattern] = &[
    pat!(r#"\bfopen\s*\([^)]*['"]r[b+]*['"]"#, "fopen", "open a file for reading"),
    pat!(r"\bopen\s*\([^)]*O_RDONLY", "open", "POSIX read-only open"),
];

const C_OUTPUT: &[DetectionPattern] = &[
    pat!(r#"\bfopen\s*\([^)]*['"][wa][b+]*['"]"#, "fopen", "open a file for writing"),
    pat!(r"\bopen\s*\([^)]*O_WRONLY", "open", "POSIX write-only open"),
];

const C_DEPENDENCY: &[DetectionPattern] =
    &[pat!(r#"^\s*#\s*include\s*[<"]"#, "#include", "header inclusion")];

// C++-only additions layered on top of the C lists.
const CPP_EXTRA_INPUT: &[DetectionPattern] = &[
    pat!(r"\bifstream\s+\w+\s*[({]", "std::ifstream", "input file stream"),
];

const CPP_EXTRA_OUTPUT: &[DetectionPattern] = &[
    pat!(r"\bofstream\s+\w+\s*[({]", "std::ofstream", "output file stream"),
];

const CPP_EXTRA_DEPENDENCY: &[DetectionPattern] = &[];

const MATLAB_INPUT: &[DetectionPattern] = &[
    pat!(r"\breadtable\s*\(", "readtable", "table import"),
    pat!(r"\breadmatrix\s*\(", "readmatrix", "matrix import"),
    pat!(r"\bcsvread\s*\(", "csvread", "CSV import"),
    pat!(r"\bimportdata\s*\(", "importdata", "generic data import"),
    pat!(r"\bload\s*\(", "load", "MAT-file import"),
];

const MATLAB_OUTPUT: &[DetectionPattern] = &[
    pat!(r"\bwritetable\s*\(", "writetable", "table export"),
    pat!(r"\bwritematrix\s*\(", "writematrix", "matrix export"),
    pat!(r"\bcsvwrite\s*\(", "csvwrite", "CSV export"),
    pat!(r"\bsaveas\s*\(", "saveas", "figure export"),
    pat!(r"\bsave\s*\(", "save", "MAT-file export"),
];

const MATLAB_DEPENDENCY: &[DetectionPattern] =
    &[pat!(r"\baddpath\s*\(", "addpath", "search path extension")];

const RUBY_INPUT: &[DetectionPattern] = &[
    pat!(r"\bFile\.read\s*\(?", "File.read", "whole-file read"),
    pat!(r"\bCSV\.read\s*\(?", "CSV.read", "CSV import"),
    pat!(r#"\bFile\.open\s*\([^)]*['"]r['"]"#, "File.open", "open a file for reading"),
];

const RUBY_OUTPUT: &[DetectionPattern] = &[
    pat!(r"\bFile\.write\s*\(?", "File.write", "whole-file write"),
    pat!(r#"\bFile\.open\s*\([^)]*['"][wa]['"]"#, "File.open", "open a file for writing"),
    pat!(r#"\bCSV\.open\s*\([^)]*['"][wa]["']"#, "CSV.open", "CSV export"),
];

const RUBY_DEPENDENCY: &[DetectionPattern] = &[
    pat!(r"^\s*require\s", "require", "library import"),
    pat!(r"^\s*require_relative\s", "require_relative", "relative file import"),
];

const LUA_INPUT: &[DetectionPattern] = &[
    pat!(r#"\bio\.open\s*\([^)]*['"]r[b]?['"]"#, "io.open", "open a file for reading"),
    pat!(r"\bio\.lines\s*\(", "io.lines", "line-by-line file read"),
];

const LUA_OUTPUT: &[DetectionPattern] = &[
    pat!(r#"\bio\.open\s*\([^)]*['"][wa][b]?['"]"#, "io.open", "open a file for writing"),
];

const LUA_DEPENDENCY: &[DetectionPattern] = &[
    pat!(r"\brequire\s*[\('\x22]", "require", "module import"),
    pat!(r"\bdofile\s*\(", "dofile", "execute another Lua file"),
];

const WGSL_INPUT: &[DetectionPattern] = &[
    pat!(
        r"var\s*<\s*storage\s*(,\s*read\s*)?>",
        "var<storage, read>",
        "read-only storage buffer binding"
    ),
    pat!(r"\btexture_2d\s*<", "texture_2d", "sampled texture binding"),
];

const WGSL_OUTPUT: &[DetectionPattern] = &[
    pat!(
        r"var\s*<\s*storage\s*,\s*read_write\s*>",
        "var<storage, read_write>",
        "writable storage buffer binding"
    ),
    pat!(
        r"\btexture_storage_2d\s*<",
        "texture_storage_2d",
        "writable storage texture binding"
    ),
];

const WGSL_DEPENDENCY: &[DetectionPattern] = &[];

const MAKEFILE_INPUT: &[DetectionPattern] = &[
    pat!(r"\$\(wildcard\b", "wildcard", "source file glob"),
    pat!(r"\$<", "$<", "first prerequisite reference"),
];

const MAKEFILE_OUTPUT: &[DetectionPattern] = &[pat!(r"\$@", "$@", "target reference")];

const MAKEFILE_DEPENDENCY: &[DetectionPattern] =
    &[pat!(r"^\s*-?include\s", "include", "makefile inclusion")];

const DOCKERFILE_INPUT: &[DetectionPattern] = &[
    pat!(r"(?i)^\s*COPY\s", "COPY", "copy files into the image"),
    pat!(r"(?i)^\s*ADD\s", "ADD", "add files into the image"),
];

const DOCKERFILE_OUTPUT: &[DetectionPattern] = &[
    pat!(r"(?i)^\s*VOLUME\s", "VOLUME", "declared mount point"),
];

const DOCKERFILE_DEPENDENCY: &[DetectionPattern] =
    &[pat!(r"(?i)^\s*FROM\s", "FROM", "base image")];

/// Returns the raw pattern lists for a language and category, composing
/// the TypeScript-over-JavaScript and C++-over-C supersets.
///
/// Unknown languages are an error; callers wanting graceful skipping
/// should consult [`has_patterns`] first.
pub fn raw_entries(language: &str, category: PatternCategory) -> Result<Vec<DetectionPattern>> {
    use PatternCategory::*;
    let lists: (&[DetectionPattern], &[DetectionPattern]) = match (language, category) {
        ("r", Input) => (R_INPUT, &[]),
        ("r", Output) => (R_OUTPUT, &[]),
        ("r", Dependency) => (R_DEPENDENCY, &[]),
        ("python", Input) => (PYTHON_INPUT, &[]),
        ("python", Output) => (PYTHON_OUTPUT, &[]),
        ("python", Dependency) => (PYTHON_DEPENDENCY, &[]),
        ("sql", Input) => (SQL_INPUT, &[]),
        ("sql", Output) => (SQL_OUTPUT, &[]),
        ("sql", Dependency) => (SQL_DEPENDENCY, &[]),
        ("shell", Input) => (SHELL_INPUT, &[]),
        ("shell", Output) => (SHELL_OUTPUT, &[]),
        ("shell", Dependency) => (SHELL_DEPENDENCY, &[]),
        ("julia", Input) => (JULIA_INPUT, &[]),
        ("julia", Output) => (JULIA_OUTPUT, &[]),
        ("julia", Dependency) => (JULIA_DEPENDENCY, &[]),
        ("javascript", Input) => (JS_INPUT, &[]),
        ("javascript", Output) => (JS_OUTPUT, &[]),
        ("javascript", Dependency) => (JS_DEPENDENCY, &[]),
        ("typescript", Input) => (JS_INPUT, TS_EXTRA_INPUT),
        ("typescript", Output) => (JS_OUTPUT, TS_EXTRA_OUTPUT),
        ("typescript", Dependency) => (JS_DEPENDENCY, TS_EXTRA_DEPENDENCY),
        ("go", Input) => (GO_INPUT, &[]),
        ("go", Output) => (GO_OUTPUT, &[]),
        ("go", Dependency) => (GO_DEPENDENCY, &[]),
        ("rust", Input) => (RUST_INPUT, &[]),
        ("rust", Output) => (RUST_OUTPUT, &[]),
        ("rust", Dependency) => (RUST_DEPENDENCY, &[]),
        ("java", Input) => (JAVA_INPUT, &[]),
        ("java", Output) => (JAVA_OUTPUT, &[]),
        ("java", Dependency) => (JAVA_DEPENDENCY, &[]),
        ("c", Input) => (C_INPUT, &[]),
        ("c", Output) => (C_OUTPUT, &[]),
        ("c", Dependency) => (C_DEPENDENCY, &[]),
        ("cpp", Input) => (C_INPUT, CPP_EXTRA_INPUT),
        ("cpp", Output) => (C_OUTPUT, CPP_EXTRA_OUTPUT),
        ("cpp", Dependency) => (C_DEPENDENCY, CPP_EXTRA_DEPENDENCY),
        ("matlab", Input) => (MATLAB_INPUT, &[]),
        ("matlab", Output) => (MATLAB_OUTPUT, &[]),
        ("matlab", Dependency) => (MATLAB_DEPENDENCY, &[]),
        ("ruby", Input) => (RUBY_INPUT, &[]),
        ("ruby", Output) => (RUBY_OUTPUT, &[]),
        ("ruby", Dependency) => (RUBY_DEPENDENCY, &[]),
        ("lua", Input) => (LUA_INPUT, &[]),
        ("lua", Output) => (LUA_OUTPUT, &[]),
        ("lua", Dependency) => (LUA_DEPENDENCY, &[]),
        ("wgsl", Input) => (WGSL_INPUT, &[]),
        ("wgsl", Output) => (WGSL_OUTPUT, &[]),
        ("wgsl", Dependency) => (WGSL_DEPENDENCY, &[]),
        ("makefile", Input) => (MAKEFILE_INPUT, &[]),
        ("makefile", Output) => (MAKEFILE_OUTPUT, &[]),
        ("makefile", Dependency) => (MAKEFILE_DEPENDENCY, &[]),
        ("dockerfile", Input) => (DOCKERFILE_INPUT, &[]),
        ("dockerfile", Output) => (DOCKERFILE_OUTPUT, &[]),
        ("dockerfile", Dependency) => (DOCKERFILE_DEPENDENCY, &[]),
        (other, _) => {
            return Err(PutError::Pattern {
                message: format!("no detection patterns for language '{}'", other),
            })
        }
    };
    let mut combined = lists.0.to_vec();
    combined.extend_from_slice(lists.1);
    Ok(combined)
}

/// Whether a language has any pattern entry.
pub fn has_patterns(language: &str) -> bool {
    raw_entries(language, PatternCategory::Input).is_ok()
}

/// Looks up patterns for a language. With a category, returns that list;
/// without one, returns all three lists keyed by category name.
pub fn lookup(
    language: &str,
    category: Option<PatternCategory>,
) -> Result<HashMap<&'static str, Vec<DetectionPattern>>> {
    let mut result = HashMap::new();
    match category {
        Some(cat) => {
            result.insert(cat.as_str(), raw_entries(language, cat)?);
        }
        None => {
            for cat in [
                PatternCategory::Input,
                PatternCategory::Output,
                PatternCategory::Dependency,
            ] {
                result.insert(cat.as_str(), raw_entries(language, cat)?);
            }
        }
    }
    Ok(result)
}

/// A pattern with its regex compiled.
pub struct CompiledPattern {
    pub regex: Regex,
    pub func: &'static str,
}

/// Compiled input and output pattern lists for one language.
pub struct CompiledPatterns {
    pub input: Vec<CompiledPattern>,
    pub output: Vec<CompiledPattern>,
}

static COMPILED: OnceLock<HashMap<&'static str, CompiledPatterns>> = OnceLock::new();

fn compile(language: &'static str) -> CompiledPatterns {
    let build = |category| {
        raw_entries(language, category)
            .unwrap_or_default()
            .iter()
            .filter_map(|p| {
                Regex::new(p.regex).ok().map(|regex| CompiledPattern {
                    regex,
                    func: p.func,
                })
            })
            .collect()
    };
    CompiledPatterns {
        input: build(PatternCategory::Input),
        output: build(PatternCategory::Output),
    }
}

/// Returns the lazily compiled input/output patterns for a language, or
/// `None` when the library has no entry for it.
pub fn compiled_patterns(language: &str) -> Option<&'static CompiledPatterns> {
    let map = COMPILED.get_or_init(|| {
        let mut map = HashMap::new();
        for lang in crate::language::DETECTION_LANGUAGES.iter().copied() {
            map.insert(lang, compile(lang));
        }
        map.insert("makefile", compile("makefile"));
        map.insert("dockerfile", compile("dockerfile"));
        map
    });
    map.get(language)
}
