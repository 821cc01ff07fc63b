// Integration tests for src/cli/help.rs — usage text

use lz4pipe::cli::help::usage_text;

#[test]
fn usage_uses_given_program_name() {
    let text = usage_text("my-lz4");
    assert!(text.starts_with("Usage : \n"));
    assert!(text.contains("my-lz4 [arg]"));
}

#[test]
fn usage_documents_environment() {
    let text = usage_text("lz4pipe");
    assert!(text.contains("LZ4PIPE_NBWORKERS"));
    assert!(text.contains("LZ4PIPE_TRANSFORM_WORKERS"));
}
