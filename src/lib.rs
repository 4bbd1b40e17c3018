/*!
# Overview
s3sweep-rs deletes Amazon S3 objects whose keys match a pattern.

It lists a bucket page by page, selects keys by full, substring, prefix or
suffix match, and removes the selection with the S3 batch DeleteObjects API.
The `s3sweep` binary is a thin wrapper over this library and can run as a
GitHub Actions step: every option is also read from an `INPUT_*`
environment variable.

## Features
- **Four match modes**: full, any (substring), prefix, suffix
- **Server-side prefix**: prefix mode narrows the listing itself
- **Dry-run**: report what would be deleted without deleting
- **Batch API**: up to 1000 keys per DeleteObjects request
- **S3-compatible endpoints**: custom endpoint URL and path-style addressing

## As a Library

```toml
[dependencies]
s3sweep-rs = "0.1"
tokio = { version = "1", features = ["full"] }
```

```no_run
use s3sweep_rs::{Config, DeletionPipeline};
use s3sweep_rs::config::args::parse_from_args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = vec![
        "s3sweep",
        "--aws-bucket-name", "my-bucket",
        "--aws-bucket-region", "us-east-1",
        "--is-full-match", "false",
        "--is-prefix-match",
        "--object-key-to-delete", "tmp/",
        "--dry-run",
    ];

    let config = Config::try_from(parse_from_args(args)?)?;
    let result = DeletionPipeline::new(config).await.run().await?;
    println!("{}", serde_json::to_string(&result.deleted)?);
    Ok(())
}
```
*/

pub mod accumulator;
pub mod config;
pub mod deleter;
pub mod lister;
pub mod matcher;
pub mod pipeline;
pub mod storage;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::Config;
pub use config::args::CLIArgs;
pub use matcher::{KeyMatcher, MatchMode};
pub use pipeline::DeletionPipeline;
pub use types::error::{S3SweepError, exit_code_from_error};
pub use types::{DeletionResult, FailedKey};
