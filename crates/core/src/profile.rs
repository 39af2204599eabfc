//! Company profile: the issuing company's own details.

use serde::{Deserialize, Serialize};

use crate::customization::{BankDetails, Branding, MobileMoneyDetails, PaymentDetails};
use crate::document::Company;

/// Persisted profile of the issuing company.
///
/// New documents take `company` as their company snapshot; the resolver
/// takes `branding` and the payment details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyProfile {
    /// Company snapshot copied into new documents.
    pub company: Company,
    /// Brand colours, fonts and logo visibility.
    pub branding: Branding,
    /// Bank transfer details.
    pub bank: Option<BankDetails>,
    /// Mobile money details.
    pub mobile_money: Option<MobileMoneyDetails>,
    /// Terms printed when a document has none.
    pub default_terms: Option<String>,
}

impl CompanyProfile {
    /// Payment values for the resolver. Unconfigured details are dropped.
    #[must_use]
    pub fn payment_details(&self) -> PaymentDetails {
        PaymentDetails {
            bank: self.bank.clone().filter(BankDetails::is_configured),
            mobile_money: self
                .mobile_money
                .clone()
                .filter(MobileMoneyDetails::is_configured),
            default_terms: self
                .default_terms
                .clone()
                .filter(|t| !t.trim().is_empty()),
        }
    }

    /// Branding with the logo hidden when the company has no logo.
    #[must_use]
    pub fn effective_branding(&self) -> Branding {
        let mut branding = self.branding.clone();
        let has_logo = self
            .company
            .logo_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if !has_logo {
            branding.show_logo = Some(false);
        }
        branding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_bank_is_dropped() {
        let profile = CompanyProfile {
            bank: Some(BankDetails {
                bank_name: "Not configured".to_string(),
                ..BankDetails::default()
            }),
            mobile_money: Some(MobileMoneyDetails {
                provider: "M-Pesa".to_string(),
                business_number: "522522".to_string(),
                account_reference: Some("ACME".to_string()),
            }),
            default_terms: Some("   ".to_string()),
            ..CompanyProfile::default()
        };

        let payment = profile.payment_details();
        assert!(payment.bank.is_none());
        assert!(payment.mobile_money.is_some());
        assert!(payment.default_terms.is_none());
    }

    #[test]
    fn test_logo_hidden_without_url() {
        let profile = CompanyProfile::default();
        assert_eq!(profile.effective_branding().show_logo, Some(false));

        let mut with_logo = CompanyProfile::default();
        with_logo.company.logo_url = Some("https://cdn.example.com/logo.png".to_string());
        assert_eq!(with_logo.effective_branding().show_logo, None);
    }
}
