//! Streaming pass-through with in-flight link extraction.
//!
//! Drives the per-response loop: read a chunk from the origin body, decode
//! it, feed it to the tokenizer, and re-emit the identical bytes to the
//! client sink — then, and only then, read the next chunk. The sink is a
//! capacity-1 channel feeding the client response body, so the loop can
//! never run ahead of the slower of origin and client.
//!
//! Once the client response has been handed out its status and headers are
//! committed; a failure in here can only truncate the body. The caller owns
//! surfacing that (log + metric), this module just reports it.

use bytes::Bytes;
use http_body_util::BodyExt;
use tokio::sync::mpsc;

use crate::error::ProxyError;
use crate::extract::decoder::StreamDecoder;
use crate::extract::tokenizer::{TagSink, Tokenizer};

/// Items flowing to the client body stream. An `Err` aborts the connection
/// so the client observes the truncation instead of a clean end.
pub type BodyChunk = Result<Bytes, std::io::Error>;

/// Collects anchor hrefs in document order. Duplicates are preserved;
/// missing and empty hrefs are not links.
#[derive(Debug, Default)]
pub struct LinkSink {
    pub links: Vec<String>,
}

impl TagSink for LinkSink {
    fn open_tag(&mut self, name: &str, attrs: &[(String, String)]) {
        if name != "a" {
            return;
        }
        if let Some((_, href)) = attrs.iter().find(|(n, _)| n == "href") {
            if !href.is_empty() {
                self.links.push(href.clone());
            }
        }
    }
}

/// One-pass streaming extractor: byte-identical pass-through plus the final
/// ordered list of discovered hrefs.
#[derive(Debug, Default)]
pub struct StreamingLinkExtractor {
    decoder: StreamDecoder,
    tokenizer: Tokenizer,
}

impl StreamingLinkExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume `body`, re-emitting every byte into `output`, and return the
    /// discovered links once the stream is drained.
    ///
    /// On failure the bytes already sent stay sent; the error is forwarded
    /// into `output` (best effort) so the client sees an aborted stream
    /// rather than a clean close.
    pub async fn run<B>(
        mut self,
        body: B,
        output: mpsc::Sender<BodyChunk>,
    ) -> Result<Vec<String>, ProxyError>
    where
        B: hyper::body::Body<Data = Bytes> + Unpin,
        B::Error: Into<ProxyError>,
    {
        let mut sink = LinkSink::default();
        match self.pump(body, &output, &mut sink).await {
            Ok(()) => Ok(sink.links),
            Err(err) => {
                if !matches!(err, ProxyError::Write) {
                    let _ = output.try_send(Err(std::io::Error::other(err.to_string())));
                }
                Err(err)
            }
        }
    }

    async fn pump<B>(
        &mut self,
        mut body: B,
        output: &mpsc::Sender<BodyChunk>,
        sink: &mut LinkSink,
    ) -> Result<(), ProxyError>
    where
        B: hyper::body::Body<Data = Bytes> + Unpin,
        B::Error: Into<ProxyError>,
    {
        while let Some(frame) = body.frame().await {
            let frame = frame.map_err(Into::into)?;
            let Ok(data) = frame.into_data() else {
                // Trailers carry no body bytes.
                continue;
            };

            let text = self.decoder.decode(&data)?;
            if text.is_empty() {
                // A chunk that ended mid-character; the bytes ride along
                // with the next chunk.
                continue;
            }
            self.tokenizer.push(&text, sink);

            // Re-encode and hand off; a refused write means the client is
            // gone and reading further from the origin is pointless.
            if output.send(Ok(Bytes::from(text))).await.is_err() {
                return Err(ProxyError::Write);
            }
        }

        self.decoder.finish()?;
        self.tokenizer.finish();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use http_body_util::StreamBody;
    use hyper::body::Frame;

    fn chunked_body(
        chunks: Vec<Vec<u8>>,
    ) -> StreamBody<impl futures_util::Stream<Item = Result<Frame<Bytes>, hyper::Error>> + Unpin>
    {
        StreamBody::new(stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<_, hyper::Error>(Frame::data(Bytes::from(c)))),
        ))
    }

    /// Run the extractor over `chunks`, returning the client-observed bytes
    /// and the extractor's result.
    async fn run_over(
        chunks: Vec<Vec<u8>>,
    ) -> (Vec<u8>, Result<Vec<String>, ProxyError>) {
        let (tx, mut rx) = mpsc::channel::<BodyChunk>(1);
        let reader = tokio::spawn(async move {
            let mut out = Vec::new();
            while let Some(item) = rx.recv().await {
                if let Ok(bytes) = item {
                    out.extend_from_slice(&bytes);
                }
            }
            out
        });
        let result = StreamingLinkExtractor::new()
            .run(chunked_body(chunks), tx)
            .await;
        (reader.await.unwrap(), result)
    }

    const DOC: &str = concat!(
        "<html><body>",
        "<a href=\"/a\">A</a>",
        "<a href=\"/b\">B</a>",
        "<a>no href</a>",
        "<a href=\"\">empty</a>",
        "</body></html>"
    );

    #[tokio::test]
    async fn single_chunk_output_is_byte_identical() {
        let (out, result) = run_over(vec![DOC.as_bytes().to_vec()]).await;
        assert_eq!(out, DOC.as_bytes());
        assert_eq!(result.unwrap(), vec!["/a", "/b"]);
    }

    #[tokio::test]
    async fn one_byte_chunks_match_single_chunk() {
        let chunks: Vec<Vec<u8>> = DOC.as_bytes().iter().map(|b| vec![*b]).collect();
        let (out, result) = run_over(chunks).await;
        assert_eq!(out, DOC.as_bytes());
        assert_eq!(result.unwrap(), vec!["/a", "/b"]);
    }

    #[tokio::test]
    async fn multibyte_and_tag_split_across_chunk_boundary() {
        // Boundary lands inside "é" and inside the anchor's attributes.
        let doc = "<p>café</p><a class=\"x\" href=\"/about\">ü</a>".as_bytes();
        let split_a = 7; // inside the two-byte é
        let split_b = 20; // inside the <a ...> tag
        let chunks = vec![
            doc[..split_a].to_vec(),
            doc[split_a..split_b].to_vec(),
            doc[split_b..].to_vec(),
        ];
        let (out, result) = run_over(chunks).await;
        assert_eq!(out, doc);
        assert_eq!(result.unwrap(), vec!["/about"]);
    }

    #[tokio::test]
    async fn empty_body_yields_no_links() {
        let (out, result) = run_over(vec![]).await;
        assert!(out.is_empty());
        assert_eq!(result.unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn invalid_bytes_abort_after_flushed_prefix() {
        let chunks = vec![b"<a href=\"/ok\">x</a>".to_vec(), vec![0xFF, 0xFE]];
        let (out, result) = run_over(chunks).await;
        // Everything before the failure point was already delivered.
        assert_eq!(out, b"<a href=\"/ok\">x</a>");
        assert!(matches!(result, Err(ProxyError::Decode(_))));
    }

    #[tokio::test]
    async fn truncated_multibyte_tail_is_an_error() {
        let (_, result) = run_over(vec![b"ok\xC3".to_vec()]).await;
        assert!(matches!(result, Err(ProxyError::Decode(_))));
    }

    #[tokio::test]
    async fn client_disconnect_aborts_the_read_loop() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let chunks: Vec<Vec<u8>> = (0..100).map(|_| b"<p>chunk</p>".to_vec()).collect();
        let result = StreamingLinkExtractor::new()
            .run(chunked_body(chunks), tx)
            .await;
        assert!(matches!(result, Err(ProxyError::Write)));
    }
}
