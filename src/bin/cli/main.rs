use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use object_gateway::{
    adapters::inbound::http::dto::UploadSessionDto, domain::models::PartResult, derive_token,
};
use reqwest::{Client, RequestBuilder, Response, Url, header};

/// Smallest part size most S3-compatible stores accept for non-final parts
const DEFAULT_PART_SIZE: usize = 5 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "object-gateway-cli")]
#[command(about = "CLI for interacting with the object gateway", long_about = None)]
struct Cli {
    /// Gateway URL
    #[arg(short, long, env = "OBJECT_GATEWAY_URL", default_value = "http://localhost:3000")]
    url: String,

    /// Shared secret the bearer token is derived from
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true)]
    secret: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the bearer token for the shared secret
    Token,

    /// Upload an object in a single request
    Put {
        /// Object key
        key: String,
        /// File path to upload
        file: String,
        /// Content type stored with the object
        #[arg(short, long)]
        content_type: Option<String>,
    },

    /// Download an object
    Get {
        /// Object key
        key: String,
        /// Output file path, stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
        /// Byte range, e.g. `0-99` or `-100`
        #[arg(long)]
        range: Option<String>,
    },

    /// Upload an object through the multipart protocol
    Multipart {
        /// Object key
        key: String,
        /// File path to upload
        file: String,
        /// Size of each part in bytes
        #[arg(long, default_value_t = DEFAULT_PART_SIZE)]
        part_size: usize,
    },
}

struct GatewayClient {
    http: Client,
    base: Url,
    token: String,
}

impl GatewayClient {
    fn new(url: &str, secret: &str) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            base: Url::parse(url).with_context(|| format!("Invalid gateway URL: {}", url))?,
            token: derive_token(secret),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Gateway URL cannot be a base: {}", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }

    async fn put(&self, key: &str, data: Vec<u8>, content_type: Option<&str>) -> Result<String> {
        let mut request = self
            .authorized(self.http.post(self.url(&["upload", key])?))
            .body(data);
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }

        let response = check(request.send().await?).await?;
        Ok(response.text().await?)
    }

    async fn get(&self, key: &str, range: Option<&str>) -> Result<bytes::Bytes> {
        let mut request = self.authorized(self.http.get(self.url(&[key])?));
        if let Some(range) = range {
            request = request.header(header::RANGE, format!("bytes={}", range));
        }

        let response = check(request.send().await?).await?;
        Ok(response.bytes().await?)
    }

    async fn multipart(&self, key: &str, data: &[u8], part_size: usize) -> Result<String> {
        if part_size == 0 {
            bail!("Part size must be greater than zero");
        }

        let init = self.authorized(self.http.post(self.url(&["upload-part", "init", key])?));
        let session: UploadSessionDto = check(init.send().await?).await?.json().await?;

        let mut parts = Vec::new();
        // An empty file still needs one part
        let chunks: Vec<&[u8]> = if data.is_empty() {
            vec![data]
        } else {
            data.chunks(part_size).collect()
        };

        for (index, chunk) in chunks.into_iter().enumerate() {
            let mut url = self.url(&["upload-part", "put", key, &session.upload_id])?;
            url.query_pairs_mut()
                .append_pair("partNumber", &(index + 1).to_string());

            let request = self.authorized(self.http.put(url)).body(chunk.to_vec());
            let part: PartResult = check(request.send().await?).await?.json().await?;
            eprintln!("uploaded part {} ({} bytes)", part.part_number, chunk.len());
            parts.push(part);
        }

        let finish = self
            .authorized(self.http.post(self.url(&[
                "upload-part",
                "finish",
                key,
                &session.upload_id,
            ])?))
            .json(&parts);
        let response = check(finish.send().await?).await?;
        Ok(response.text().await?)
    }
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    bail!("Gateway returned {}: {}", status, body)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let secret = cli
        .secret
        .as_deref()
        .context("A shared secret is required (--secret or AUTH_TOKEN)")?;

    if let Commands::Token = cli.command {
        println!("{}", derive_token(secret));
        return Ok(());
    }

    let client = GatewayClient::new(&cli.url, secret)?;

    match cli.command {
        Commands::Token => {}
        Commands::Put {
            key,
            file,
            content_type,
        } => {
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file))?;
            let stored = client.put(&key, data, content_type.as_deref()).await?;
            println!("{}", stored);
        }
        Commands::Get { key, output, range } => {
            let data = client.get(&key, range.as_deref()).await?;
            match output {
                Some(path) => tokio::fs::write(&path, &data)
                    .await
                    .with_context(|| format!("Failed to write {}", path))?,
                None => {
                    use std::io::Write;
                    std::io::stdout().write_all(&data)?;
                }
            }
        }
        Commands::Multipart {
            key,
            file,
            part_size,
        } => {
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file))?;
            let stored = client.multipart(&key, &data, part_size).await?;
            println!("{}", stored);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "object-gateway-cli",
            "--secret",
            "s",
            "get",
            "photo.jpg",
            "--range",
            "0-99",
            "-o",
            "out.jpg",
        ]);

        match cli.command {
            Commands::Get { key, output, range } => {
                assert_eq!(key, "photo.jpg");
                assert_eq!(output.as_deref(), Some("out.jpg"));
                assert_eq!(range.as_deref(), Some("0-99"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_url_segments_are_encoded() {
        let client = GatewayClient::new("http://localhost:3000/", "s").unwrap();

        let url = client.url(&["upload", "dir/a b.txt"]).unwrap();

        assert_eq!(url.as_str(), "http://localhost:3000/upload/dir%2Fa%20b.txt");
    }

    #[test]
    fn test_token_is_derived() {
        let client = GatewayClient::new("http://localhost:3000", "abc").unwrap();

        assert_eq!(client.token, "a9993e364706816aba3e25717850c26c9cd0d89d");
    }
}
