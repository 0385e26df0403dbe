//! 리포트 메일 조립 및 전송
//!
//! 본문은 plain text/HTML `multipart/alternative`이며, CSV가 있으면
//! `results.csv` 첨부와 함께 `multipart/mixed`로 감쌉니다.
//!
//! 전송 구현:
//! - [`SmtpMailer`]: 평문 SMTP 릴레이로 전송
//! - [`LogMailer`]: 테스트 모드. 전송 대신 HTML 본문을 로그로 출력

use std::future::Future;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use smsprobe_core::config::ReportConfig;
use smsprobe_core::error::{MailError, ProbeError};

use crate::render::RenderedReport;

/// 첨부 파일 이름
pub const CSV_FILENAME: &str = "results.csv";

/// 발송할 리포트 메일
#[derive(Debug, Clone)]
pub struct ReportEmail {
    pub subject: String,
    pub from: String,
    pub to: Vec<String>,
    pub text: String,
    pub html: String,
    pub csv: Option<String>,
}

impl ReportEmail {
    pub fn new(config: &ReportConfig, report: RenderedReport) -> Self {
        Self {
            subject: report.subject,
            from: config.email_from.clone(),
            to: config.email_to.clone(),
            text: report.text,
            html: report.html,
            csv: report.csv,
        }
    }

    /// lettre 메시지로 변환합니다.
    pub fn to_message(&self) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.from)?)
            .subject(self.subject.clone());
        for address in &self.to {
            builder = builder.to(parse_mailbox(address)?);
        }

        let alternative = MultiPart::alternative_plain_html(self.text.clone(), self.html.clone());
        let body = match &self.csv {
            Some(csv) => {
                let content_type = ContentType::parse("text/csv")
                    .map_err(|e| MailError::Build(e.to_string()))?;
                MultiPart::mixed()
                    .multipart(alternative)
                    .singlepart(Attachment::new(CSV_FILENAME.to_owned()).body(csv.clone(), content_type))
            }
            None => alternative,
        };

        builder
            .multipart(body)
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailError::Address {
        address: address.to_owned(),
        reason: e.to_string(),
    })
}

/// 메일 전송 trait
pub trait MailTransport: Send + Sync {
    fn send(&self, email: &ReportEmail) -> impl Future<Output = Result<(), ProbeError>> + Send;
}

/// 평문 SMTP 전송 (TLS/인증 없음)
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    server: String,
    port: u16,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("server", &self.server)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    pub fn new(server: &str, port: u16) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(server)
            .port(port)
            .build();
        Self {
            transport,
            server: server.to_owned(),
            port,
        }
    }
}

impl MailTransport for SmtpMailer {
    async fn send(&self, email: &ReportEmail) -> Result<(), ProbeError> {
        let message = email.to_message()?;
        debug!(server = %self.server, port = self.port, recipients = email.to.len(), "sending report email");
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;
        info!(
            server = %self.server,
            code = %response.code(),
            "report email accepted by relay"
        );
        Ok(())
    }
}

/// 전송하지 않고 HTML 본문을 로그로 남기는 transport
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl MailTransport for LogMailer {
    async fn send(&self, email: &ReportEmail) -> Result<(), ProbeError> {
        // 주소 형식 오류는 테스트 모드에서도 잡아냅니다.
        email.to_message()?;
        info!(
            subject = %email.subject,
            recipients = ?email.to,
            csv_attached = email.csv.is_some(),
            html = %email.html,
            "testing mode: report email not sent"
        );
        Ok(())
    }
}

/// 설정에서 선택되는 transport
#[derive(Debug, Clone)]
pub enum Mailer {
    Smtp(SmtpMailer),
    Log(LogMailer),
}

impl Mailer {
    pub fn from_config(config: &ReportConfig) -> Self {
        if config.testing_mode {
            Self::Log(LogMailer)
        } else {
            Self::Smtp(SmtpMailer::new(&config.smtp_server, config.smtp_port))
        }
    }
}

impl MailTransport for Mailer {
    async fn send(&self, email: &ReportEmail) -> Result<(), ProbeError> {
        match self {
            Self::Smtp(m) => m.send(email).await,
            Self::Log(m) => m.send(email).await,
        }
    }
}
