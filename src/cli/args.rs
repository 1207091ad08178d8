//! CLI argument parsing

#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub target: String,
    pub metadata: Option<String>,
    pub vba_project: Option<String>,
    pub output_name: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Parse command line arguments
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli_args = CliArgs::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--metadata" => {
                i += 1;
                if i >= args.len() {
                    return Err("--metadata requires a file path".to_string());
                }
                cli_args.metadata = Some(args[i].clone());
            }
            "--vba-project" => {
                i += 1;
                if i >= args.len() {
                    return Err("--vba-project requires a file path".to_string());
                }
                cli_args.vba_project = Some(args[i].clone());
            }
            "--output-name" => {
                i += 1;
                if i >= args.len() {
                    return Err("--output-name requires a value".to_string());
                }
                let name = args[i].clone();
                if name.is_empty() || name.contains(['/', '\\']) {
                    return Err("--output-name must be a plain file name".to_string());
                }
                cli_args.output_name = Some(name);
            }
            "--json" => {
                cli_args.json = true;
            }
            "--quiet" => {
                cli_args.quiet = true;
            }
            arg if !arg.starts_with("--") => {
                if cli_args.target.is_empty() {
                    cli_args.target = trim_trailing_separator(arg).to_string();
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if cli_args.target.is_empty() {
        return Err(
            "Missing required argument: TARGET. Did you pass the target path as a command line argument?"
                .to_string(),
        );
    }

    Ok(cli_args)
}

/// Drop trailing separators unless the path is a bare root such as `/` or `C:\`.
fn trim_trailing_separator(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() || trimmed.ends_with(':') {
        path
    } else {
        trimmed
    }
}
