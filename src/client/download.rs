//! Streaming download into a caller-owned sink.

use http_body_util::BodyExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::TransportError;
use crate::http::{DownloadSummary, RequestDescriptor};

use super::{into_wire_request, CancelToken, HttpClient};

impl HttpClient {
    /// Stream the response body into `destination` as it arrives.
    ///
    /// Memory use is bounded by the frame size regardless of body length;
    /// each frame is written and flushed before the next is read. On
    /// failure the destination keeps every byte already written;
    /// truncated output is the caller's to clean up, it is not rolled
    /// back.
    pub async fn download<W>(
        &self,
        request: RequestDescriptor,
        destination: &mut W,
    ) -> Result<DownloadSummary, TransportError>
    where
        W: AsyncWrite + Unpin,
    {
        self.download_inner(request, destination, None).await
    }

    /// [`download`](Self::download), abandoning the transfer when
    /// `cancel` fires. The connection is closed, the destination keeps
    /// the bytes written so far, and the caller gets
    /// [`TransportError::Cancelled`].
    pub async fn download_with_cancel<W>(
        &self,
        request: RequestDescriptor,
        destination: &mut W,
        cancel: &CancelToken,
    ) -> Result<DownloadSummary, TransportError>
    where
        W: AsyncWrite + Unpin,
    {
        self.download_inner(request, destination, Some(cancel)).await
    }

    async fn download_inner<W>(
        &self,
        request: RequestDescriptor,
        destination: &mut W,
        cancel: Option<&CancelToken>,
    ) -> Result<DownloadSummary, TransportError>
    where
        W: AsyncWrite + Unpin,
    {
        self.stats.record_request();
        let deadline = request.timeout().unwrap_or(self.config.timeout);

        let result = match tokio::time::timeout(
            deadline,
            self.stream_to(request, destination, cancel),
        )
        .await
        {
            Ok(inner) => inner,
            Err(_) => Err(TransportError::Timeout { limit: deadline }),
        };

        match &result {
            Ok(summary) => {
                self.stats.record_success();
                self.stats.record_bytes_received(summary.bytes_written);
            }
            Err(_) => self.stats.record_failure(),
        }
        result
    }

    async fn stream_to<W>(
        &self,
        request: RequestDescriptor,
        destination: &mut W,
        cancel: Option<&CancelToken>,
    ) -> Result<DownloadSummary, TransportError>
    where
        W: AsyncWrite + Unpin,
    {
        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(TransportError::Cancelled);
            }
        }

        let (key, mut sender) = self.obtain_connection(request.url()).await?;
        let wire = into_wire_request(&request, &self.config)?;

        let send = sender.send_request(wire);
        let response = match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(TransportError::Cancelled),
                    res = send => res,
                }
            }
            None => send.await,
        }
        .map_err(|e| TransportError::ConnectionFailed(Box::new(e)))?;

        let (parts, mut body) = response.into_parts();
        let mut bytes_written: u64 = 0;

        loop {
            let next = body.frame();
            let frame = match cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => return Err(TransportError::Cancelled),
                        frame = next => frame,
                    }
                }
                None => next.await,
            };
            let Some(frame) = frame else { break };
            let frame = frame.map_err(|e| TransportError::ConnectionFailed(Box::new(e)))?;
            if let Ok(data) = frame.into_data() {
                destination
                    .write_all(&data)
                    .await
                    .map_err(TransportError::Sink)?;
                destination.flush().await.map_err(TransportError::Sink)?;
                bytes_written += data.len() as u64;
                tracing::trace!(bytes = data.len(), total = bytes_written, "wrote body frame");
            }
        }

        // Fully drained, safe to reuse the connection.
        self.pool.checkin(key, sender).await;
        Ok(DownloadSummary {
            bytes_written,
            status: parts.status,
        })
    }
}
