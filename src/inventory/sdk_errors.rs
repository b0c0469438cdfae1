//! AWS SDK error categorization for per-region status lines.
//!
//! The AWS SDK handles retries internally with exponential backoff; no
//! application-level retry is layered on top. This module only turns an
//! error's string form into a compact, categorized reason for the region
//! status line, and detects the "no resource index" probe answer.

/// Categorized error types for AWS SDK errors.
#[derive(Debug, Clone)]
pub enum ErrorCategory {
    /// Request was throttled due to rate limiting.
    Throttled { service: String, error_code: String },
    /// Request timed out.
    Timeout { operation: String },
    /// Network connectivity issues.
    NetworkError { message: String },
    /// AWS service temporarily unavailable.
    ServiceUnavailable { service: String },
    /// Non-retryable error (permissions, validation, etc.).
    NonRetryable { code: String, is_permission_error: bool },
}

impl ErrorCategory {
    /// User-facing message for the region status line.
    pub fn user_message(&self) -> String {
        match self {
            ErrorCategory::Throttled { service, .. } => format!("{} rate limited", service),
            ErrorCategory::Timeout { operation } => format!("{} timeout", operation),
            ErrorCategory::NetworkError { .. } => "Network error".to_string(),
            ErrorCategory::ServiceUnavailable { service } => format!("{} unavailable", service),
            ErrorCategory::NonRetryable { code, .. } => code.clone(),
        }
    }
}

/// True when the error is the resource-discovery service reporting that the
/// region has no index. Expected and non-fatal; the scan downgrades it to a
/// per-region skip.
pub fn is_index_not_found(error: &anyhow::Error) -> bool {
    format!("{:?}", error).contains("ResourceNotFoundException")
}

/// Analyze an error and categorize it by its string representation.
///
/// anyhow wraps SDK errors whose Display form can be a bare "service
/// error"; the Debug form carries the modeled error code in that case.
pub fn categorize_error(error: &anyhow::Error, service: &str, operation: &str) -> ErrorCategory {
    let error_str = error.to_string();
    let error_debug = format!("{:?}", error);

    let detail = if error_str.contains("service error") {
        &error_debug
    } else {
        &error_str
    };

    categorize_error_string(detail, service, operation)
}

/// Categorize an error string against known AWS error patterns.
pub fn categorize_error_string(error_str: &str, service: &str, operation: &str) -> ErrorCategory {
    // Throttling errors (most common transient error)
    if error_str.contains("ThrottlingException")
        || error_str.contains("Throttling")
        || error_str.contains("TooManyRequestsException")
        || error_str.contains("RequestLimitExceeded")
        || error_str.contains("RateExceeded")
    {
        let error_code = extract_error_code(error_str).unwrap_or("Throttling".to_string());
        return ErrorCategory::Throttled {
            service: service.to_string(),
            error_code,
        };
    }

    // Timeout errors
    if error_str.contains("TimeoutError")
        || error_str.contains("timeout")
        || error_str.contains("timed out")
    {
        return ErrorCategory::Timeout {
            operation: operation.to_string(),
        };
    }

    // Network/dispatch errors
    if error_str.contains("DispatchFailure")
        || error_str.contains("connection")
        || error_str.contains("Connection")
        || error_str.contains("network")
        || error_str.contains("Network")
        || error_str.contains("DNS")
    {
        return ErrorCategory::NetworkError {
            message: truncate_message(error_str, 100),
        };
    }

    // Service unavailable (AWS-side transient errors)
    if error_str.contains("ServiceUnavailable")
        || error_str.contains("InternalServerError")
        || error_str.contains("InternalServerException")
        || error_str.contains("503")
    {
        return ErrorCategory::ServiceUnavailable {
            service: service.to_string(),
        };
    }

    let is_permission_error = error_str.contains("AccessDenied")
        || error_str.contains("AccessDeniedException")
        || error_str.contains("UnauthorizedException")
        || error_str.contains("UnauthorizedOperation")
        || error_str.contains("InvalidClientTokenId")
        || error_str.contains("SignatureDoesNotMatch");

    let code = extract_error_code(error_str).unwrap_or_else(|| {
        if is_permission_error {
            "AccessDenied".to_string()
        } else {
            "Error".to_string()
        }
    });

    ErrorCategory::NonRetryable {
        code,
        is_permission_error,
    }
}

/// Extract an AWS error code from an error message if present.
fn extract_error_code(error_str: &str) -> Option<String> {
    // Pattern 1: "ThrottlingException: Rate exceeded"
    if let Some(pos) = error_str.find(':') {
        let prefix = error_str[..pos].trim();
        if prefix.ends_with("Exception")
            || prefix.ends_with("Error")
            || prefix.chars().next().is_some_and(|c| c.is_uppercase())
        {
            let code = prefix.rsplit("::").next().unwrap_or(prefix);
            if !code.is_empty() && code.len() < 50 {
                return Some(code.to_string());
            }
        }
    }

    // Pattern 2: code: "ErrorName" in debug output
    if let Some(start) = error_str.find("code:") {
        let after_code = &error_str[start + 5..];
        if let Some(quote_start) = after_code.find('"') {
            let after_quote = &after_code[quote_start + 1..];
            if let Some(quote_end) = after_quote.find('"') {
                let code = &after_quote[..quote_end];
                if !code.is_empty() && code.len() < 50 {
                    return Some(code.to_string());
                }
            }
        }
    }

    None
}

fn truncate_message(msg: &str, max_len: usize) -> String {
    if msg.len() <= max_len {
        msg.to_string()
    } else {
        format!("{}...", &msg[..max_len - 3])
    }
}
