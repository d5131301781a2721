//! Framed TLS transport (C12). A server socket, wrapped in TLS via a
//! PKCS#12 keystore, dispatches one worker task per connection; each
//! worker reads exactly one length-prefixed frame, routes it, and writes
//! exactly one response frame before closing (spec.md §4.7).

use crate::config::ServerConfig;
use crate::controller::{handle_diagnose, handle_disease, handle_patient};
use crate::router::{self, Route};
use crate::store::{DiagnosisStore, DiseaseStore, HistoryStore, PatientStore, ReportStore};
use crate::service::{DiagnosisService, DiseaseService, PatientService};
use crate::BioGuardError;
use native_tls::Identity;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_native_tls::TlsAcceptor;

/// The five file-backed stores, held for the lifetime of the process and
/// shared across connection workers. Each store serializes its own
/// mutations internally (spec.md §5), so sharing by reference is safe.
pub struct Stores {
    pub patients: PatientStore,
    pub diseases: DiseaseStore,
    pub diagnoses: DiagnosisStore,
    pub reports: ReportStore,
    pub history: HistoryStore,
}

impl Stores {
    pub fn from_config(config: &ServerConfig) -> Result<Self, BioGuardError> {
        Ok(Self {
            patients: PatientStore::new(&config.patients_csv_path)?,
            diseases: DiseaseStore::new(&config.diseases_directory)?,
            diagnoses: DiagnosisStore::new(&config.diagnostics_directory)?,
            reports: ReportStore::new(
                config.reports_directory.join("reporte_alta_infecciosidad.csv"),
            )?,
            history: HistoryStore::new(&config.diagnostics_directory)?,
        })
    }
}

fn build_acceptor(config: &ServerConfig) -> Result<TlsAcceptor, BioGuardError> {
    let keystore_bytes = std::fs::read(&config.keystore_path)?;
    let identity = Identity::from_pkcs12(&keystore_bytes, &config.keystore_password)
        .map_err(|e| BioGuardError::Validation(format!("invalid keystore: {e}")))?;
    let acceptor = native_tls::TlsAcceptor::new(identity)
        .map_err(|e| BioGuardError::Unexpected(format!("failed to build TLS acceptor: {e}")))?;
    Ok(TlsAcceptor::from(acceptor))
}

/// Bind the configured port, wrap every accepted connection in TLS, and
/// spawn one worker per connection. Runs until the listener itself fails.
pub async fn serve(config: ServerConfig, stores: Arc<Stores>) -> Result<(), BioGuardError> {
    let acceptor = build_acceptor(&config)?;
    let listener = TcpListener::bind(("0.0.0.0", config.server_port)).await?;
    tracing::info!("BioGuard listening on port {}", config.server_port);

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!("accept failed: {e}");
                continue;
            }
        };

        let acceptor = acceptor.clone();
        let stores = Arc::clone(&stores);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, acceptor, &stores).await {
                tracing::warn!("connection from {peer} terminated: {e}");
            }
        });
    }
}

async fn handle_connection(
    socket: tokio::net::TcpStream,
    acceptor: TlsAcceptor,
    stores: &Stores,
) -> Result<(), BioGuardError> {
    let mut tls = acceptor
        .accept(socket)
        .await
        .map_err(|e| BioGuardError::Unexpected(format!("TLS handshake failed: {e}")))?;

    let frame = read_frame(&mut tls).await?;
    let response = dispatch(&frame, stores);
    write_frame(&mut tls, &response).await?;

    Ok(())
}

async fn read_frame<S: tokio::io::AsyncRead + Unpin>(stream: &mut S) -> Result<String, BioGuardError> {
    let len = stream.read_u16().await? as usize;
    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf).await?;
    String::from_utf8(buf).map_err(|e| BioGuardError::MalformedRequest(format!("non-UTF-8 frame: {e}")))
}

async fn write_frame<S: tokio::io::AsyncWrite + Unpin>(
    stream: &mut S,
    payload: &str,
) -> Result<(), BioGuardError> {
    let bytes = payload.as_bytes();
    let len: u16 = bytes
        .len()
        .try_into()
        .map_err(|_| BioGuardError::Unexpected("response frame too large".to_string()))?;
    stream.write_u16(len).await?;
    stream.write_all(bytes).await?;
    stream.flush().await?;
    Ok(())
}

/// Parse and route one frame, catching any routing/format failure into the
/// generic `[500][InternalError]` response only when it escapes the
/// controller layer; controller errors are already formatted responses.
fn dispatch(frame: &str, stores: &Stores) -> String {
    let request = match router::parse_frame(frame) {
        Ok(r) => r,
        Err(e) => return crate::controller::error_response(&e),
    };

    let route = match router::resolve(&request) {
        Ok(r) => r,
        Err(e) => return crate::controller::error_response(&e),
    };

    match route {
        Route::RegisterPatient => {
            let service = PatientService::new(&stores.patients);
            handle_patient(&request.content_type, &request.body, &service)
        }
        Route::RegisterDisease => {
            let service = DiseaseService::new(&stores.diseases);
            handle_disease(&request.content_type, &request.body, &service)
        }
        Route::Diagnose => {
            let service = DiagnosisService::new(
                &stores.patients,
                &stores.diseases,
                &stores.diagnoses,
                &stores.reports,
                &stores.history,
            );
            handle_diagnose(&request.content_type, &request.body, &service)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_stores() -> (tempfile::TempDir, Stores) {
        let dir = tempfile::tempdir().unwrap();
        let stores = Stores {
            patients: PatientStore::new(dir.path().join("patients.csv")).unwrap(),
            diseases: DiseaseStore::new(dir.path().join("diseases")).unwrap(),
            diagnoses: DiagnosisStore::new(dir.path().join("diagnostics")).unwrap(),
            reports: ReportStore::new(dir.path().join("report.csv")).unwrap(),
            history: HistoryStore::new(dir.path().join("history")).unwrap(),
        };
        (dir, stores)
    }

    #[test]
    fn dispatch_routes_patient_registration() {
        let (_dir, stores) = test_stores();
        let frame = "POST patient\napplication/fasta\n>12345678|Juan|Perez|30|juan@mail.com|MASCULINO|Bogota|Colombia";
        assert_eq!(dispatch(frame, &stores), "[TCP][201][Created]");
    }

    #[test]
    fn dispatch_reports_unknown_route() {
        let (_dir, stores) = test_stores();
        let frame = "DELETE patient\napplication/fasta\nbody";
        assert!(dispatch(frame, &stores).starts_with("[TCP][404][RouteNotFound]"));
    }

    #[test]
    fn dispatch_reports_malformed_frame() {
        let (_dir, stores) = test_stores();
        assert!(dispatch("not a valid frame", &stores).starts_with("[TCP][400][MalformedRequest]"));
    }
}
