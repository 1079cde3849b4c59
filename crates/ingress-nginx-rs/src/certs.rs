//! Certificate chain decoding
//!
//! `ingress-nginx certs` prints the chain served for a host as concatenated
//! PEM blocks. This module re-presents that blob for reading: each block is
//! kept verbatim and followed by a decoded summary of the fields an
//! operator actually checks (names, validity, fingerprints). Anything that
//! does not parse passes through untouched.

use crate::error::IngressNginxError;
use ring::digest::{self, SHA1_FOR_LEGACY_USE_ONLY, SHA256};
use x509_parser::extensions::{GeneralName, KeyUsage, ParsedExtension};
use x509_parser::pem::parse_x509_pem;

const BEGIN_MARKER: &str = "-----BEGIN CERTIFICATE-----";
const END_MARKER: &str = "-----END CERTIFICATE-----";

const OID_AD_OCSP: &str = "1.3.6.1.5.5.7.48.1";
const OID_AD_CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";

/// Decoded fields of one certificate, used only to build display text
#[derive(Debug, Clone)]
pub struct CertificateSummary {
    pub subject: String,
    pub issuer: String,
    pub subject_alt_names: Vec<String>,
    pub authority_info_access: Vec<String>,
    pub not_before: String,
    pub not_after: String,
    pub fingerprint_sha1: String,
    pub fingerprint_sha256: String,
    pub key_usage: Vec<String>,
    pub serial: String,
}

impl CertificateSummary {
    fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Subject: {}\n", self.subject));
        if !self.subject_alt_names.is_empty() {
            out.push_str("Subject Alternative Names:\n");
            for name in &self.subject_alt_names {
                out.push_str(&format!("\t{name}\n"));
            }
        }
        out.push_str(&format!("Issuer: {}\n", self.issuer));
        if !self.authority_info_access.is_empty() {
            out.push_str("Authority Information Access:\n");
            for entry in &self.authority_info_access {
                out.push_str(&format!("\t{entry}\n"));
            }
        }
        out.push_str(&format!("Valid From: {}\n", self.not_before));
        out.push_str(&format!("Valid To: {}\n", self.not_after));
        out.push_str(&format!("Fingerprint (SHA-1): {}\n", self.fingerprint_sha1));
        out.push_str(&format!(
            "Fingerprint (SHA-256): {}\n",
            self.fingerprint_sha256
        ));
        if !self.key_usage.is_empty() {
            out.push_str("Key Usage:\n");
            for usage in &self.key_usage {
                out.push_str(&format!("\t{usage}\n"));
            }
        }
        out.push_str(&format!("Serial Number: {}\n", self.serial));
        out
    }
}

/// Re-present a blob of concatenated PEM certificates for display.
///
/// Splits on the end marker and classifies each fragment. Certificate
/// fragments are reconstructed into complete PEM blocks and, when they
/// parse, followed by a summary. Fragments that are not certificates, and
/// blocks that fail to parse, appear in the output unmodified; a blob with
/// no markers comes back byte-identical.
pub fn decode_certificates(blob: &str) -> String {
    let mut out = String::new();

    for fragment in blob.split(END_MARKER) {
        if !fragment.trim_start().starts_with(BEGIN_MARKER) {
            out.push_str(fragment);
            continue;
        }

        let body = fragment.trim();
        let pem_block = if body.ends_with('\n') {
            format!("{body}{END_MARKER}")
        } else {
            format!("{body}\n{END_MARKER}")
        };

        match summarize(&pem_block) {
            Ok(summary) => {
                out.push_str(&pem_block);
                out.push_str("\n\n");
                out.push_str(&summary.render());
                out.push('\n');
            }
            Err(e) => {
                tracing::warn!("failed to decode certificate block: {e}");
                out.push_str(&pem_block);
                out.push('\n');
            }
        }
    }

    out
}

/// Decode one complete PEM block into its display summary.
pub fn summarize(pem_block: &str) -> Result<CertificateSummary, IngressNginxError> {
    let (_, pem) = parse_x509_pem(pem_block.as_bytes())
        .map_err(|e| IngressNginxError::CertificateParse(e.to_string()))?;
    let cert = pem
        .parse_x509()
        .map_err(|e| IngressNginxError::CertificateParse(e.to_string()))?;

    let mut subject_alt_names = Vec::new();
    let mut authority_info_access = Vec::new();
    let mut key_usage = Vec::new();

    for ext in cert.extensions() {
        match ext.parsed_extension() {
            ParsedExtension::SubjectAlternativeName(san) => {
                for name in &san.general_names {
                    subject_alt_names.push(format_general_name(name));
                }
            }
            ParsedExtension::AuthorityInfoAccess(aia) => {
                for desc in &aia.accessdescs {
                    authority_info_access.push(format!(
                        "{} - {}",
                        access_method_name(&desc.access_method.to_id_string()),
                        format_general_name(&desc.access_location)
                    ));
                }
            }
            ParsedExtension::KeyUsage(usage) => {
                key_usage = key_usage_flags(usage);
            }
            _ => {}
        }
    }

    Ok(CertificateSummary {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        subject_alt_names,
        authority_info_access,
        not_before: cert.validity().not_before.to_string(),
        not_after: cert.validity().not_after.to_string(),
        fingerprint_sha1: fingerprint(&SHA1_FOR_LEGACY_USE_ONLY, &pem.contents),
        fingerprint_sha256: fingerprint(&SHA256, &pem.contents),
        key_usage,
        serial: cert.raw_serial_as_string(),
    })
}

/// Colon-delimited uppercase hex digest of the DER bytes
fn fingerprint(algorithm: &'static digest::Algorithm, der: &[u8]) -> String {
    let hash = digest::digest(algorithm, der);
    let hex = hex::encode_upper(hash.as_ref());
    let mut out = String::with_capacity(hex.len() + hex.len() / 2);
    for (i, ch) in hex.chars().enumerate() {
        if i > 0 && i % 2 == 0 {
            out.push(':');
        }
        out.push(ch);
    }
    out
}

fn format_general_name(name: &GeneralName) -> String {
    match name {
        GeneralName::DNSName(dns) => format!("DNS:{dns}"),
        GeneralName::RFC822Name(email) => format!("email:{email}"),
        GeneralName::URI(uri) => format!("URI:{uri}"),
        GeneralName::IPAddress(bytes) => match bytes {
            [a, b, c, d] => format!("IP:{a}.{b}.{c}.{d}"),
            other => format!("IP:{}", hex::encode(other)),
        },
        other => other.to_string(),
    }
}

fn access_method_name(oid: &str) -> String {
    match oid {
        OID_AD_OCSP => "OCSP".to_string(),
        OID_AD_CA_ISSUERS => "CA Issuers".to_string(),
        other => other.to_string(),
    }
}

fn key_usage_flags(usage: &KeyUsage) -> Vec<String> {
    let named = [
        ("Digital Signature", usage.digital_signature()),
        ("Non Repudiation", usage.non_repudiation()),
        ("Key Encipherment", usage.key_encipherment()),
        ("Data Encipherment", usage.data_encipherment()),
        ("Key Agreement", usage.key_agreement()),
        ("Certificate Sign", usage.key_cert_sign()),
        ("CRL Sign", usage.crl_sign()),
        ("Encipher Only", usage.encipher_only()),
        ("Decipher Only", usage.decipher_only()),
    ];
    named
        .iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{
        Certificate, CertificateParams, DistinguishedName, DnType, KeyUsagePurpose,
    };

    fn self_signed(cn: &str, hosts: &[&str]) -> String {
        let mut params =
            CertificateParams::new(hosts.iter().map(|h| h.to_string()).collect::<Vec<_>>());
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, cn);
        params.distinguished_name = dn;
        params.key_usages = vec![
            KeyUsagePurpose::DigitalSignature,
            KeyUsagePurpose::KeyEncipherment,
        ];
        let cert = Certificate::from_params(params).unwrap();
        cert.serialize_pem().unwrap()
    }

    fn field<'a>(out: &'a str, label: &str) -> &'a str {
        out.lines()
            .find(|line| line.starts_with(label))
            .map(|line| line[label.len()..].trim())
            .unwrap_or_else(|| panic!("missing field {label}"))
    }

    #[test]
    fn empty_blob_decodes_to_empty_output() {
        assert_eq!(decode_certificates(""), "");
    }

    #[test]
    fn marker_free_blob_passes_through_unchanged() {
        let blob = "upstream default-backend;\nserver 10.0.0.1:8080;\n";
        assert_eq!(decode_certificates(blob), blob);
    }

    #[test]
    fn single_certificate_gets_pem_and_summary() {
        let pem = self_signed("demo.example.com", &["demo.example.com"]);
        let out = decode_certificates(&pem);

        assert!(out.contains(BEGIN_MARKER));
        assert!(out.contains(END_MARKER));
        assert!(field(&out, "Subject:").contains("CN=demo.example.com"));
        assert!(field(&out, "Issuer:").contains("CN=demo.example.com"));
        assert!(out.contains("\tDNS:demo.example.com"));
        assert!(out.contains("\tDigital Signature"));
        assert!(out.contains("\tKey Encipherment"));

        let serial = field(&out, "Serial Number:");
        assert!(!serial.is_empty());
        assert!(
            serial.chars().all(|c| c == ':' || c.is_ascii_hexdigit()),
            "unexpected serial characters: {serial}"
        );
    }

    #[test]
    fn fingerprints_are_colon_delimited_hex() {
        let pem = self_signed("demo.example.com", &["demo.example.com"]);
        let out = decode_certificates(&pem);

        let sha1 = field(&out, "Fingerprint (SHA-1):");
        let sha256 = field(&out, "Fingerprint (SHA-256):");
        // 20 and 32 bytes as hex pairs joined with colons
        assert_eq!(sha1.len(), 59);
        assert_eq!(sha256.len(), 95);
        for fp in [sha1, sha256] {
            assert!(
                fp.chars()
                    .all(|c| c == ':' || c.is_ascii_hexdigit()),
                "unexpected fingerprint characters: {fp}"
            );
            assert_eq!(fp.split(':').count(), fp.len() / 3 + 1);
        }
    }

    #[test]
    fn chain_keeps_original_order_with_one_summary_each() {
        let first = self_signed("a.test", &["a.test"]);
        let second = self_signed("b.test", &["b.test"]);
        let out = decode_certificates(&format!("{first}{second}"));

        assert_eq!(out.matches("Fingerprint (SHA-256):").count(), 2);
        assert_eq!(out.matches(BEGIN_MARKER).count(), 2);
        let a = out.find("CN=a.test").expect("first subject missing");
        let b = out.find("CN=b.test").expect("second subject missing");
        assert!(a < b, "summaries out of order");
    }

    #[test]
    fn malformed_block_passes_through_without_failing_the_rest() {
        let valid = self_signed("good.test", &["good.test"]);
        let broken = format!("{BEGIN_MARKER}\nnot a certificate at all\n{END_MARKER}\n");
        let out = decode_certificates(&format!("{valid}{broken}"));

        assert_eq!(out.matches("Fingerprint (SHA-256):").count(), 1);
        assert!(out.contains("CN=good.test"));
        assert!(out.contains("not a certificate at all"));
    }

    #[test]
    fn trailing_text_after_the_chain_is_preserved() {
        let pem = self_signed("wrapped.test", &["wrapped.test"]);
        let out = decode_certificates(&format!("{pem}end of chain\n"));

        assert!(out.contains("CN=wrapped.test"));
        assert!(out.ends_with("end of chain\n"));
    }
}
