// Legal-service catalogue backing the inquiry form's `service` selection.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Service {
    pub id: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
}

pub const SERVICES: [Service; 10] = [
    Service {
        id: "raf",
        title: "Road Accident Funds Claims (RAF)",
        summary: "Expert representation for accident-related claims with proven success rates.",
    },
    Service {
        id: "medical",
        title: "Medical Negligence",
        summary: "Comprehensive legal support for medical malpractice cases.",
    },
    Service {
        id: "wills",
        title: "Wills and Estate Administration",
        summary: "Professional guidance for estate planning and administration.",
    },
    Service {
        id: "family",
        title: "Family Law",
        summary: "Divorces, maintenance, custody, and family dispute resolution.",
    },
    Service {
        id: "civil",
        title: "Civil Litigation",
        summary: "Strategic representation for civil disputes and legal matters.",
    },
    Service {
        id: "criminal",
        title: "Criminal Litigation",
        summary: "Experienced defense for criminal cases of all complexities.",
    },
    Service {
        id: "corporate",
        title: "Corporate and Commercial Law",
        summary: "Business legal services, contracts, and commercial transactions.",
    },
    Service {
        id: "labour",
        title: "Labour and Employment Law",
        summary: "Employment disputes, CCMA representation, and workplace matters.",
    },
    Service {
        id: "eviction",
        title: "Eviction",
        summary: "Legal assistance for landlord-tenant disputes and eviction proceedings.",
    },
    Service {
        id: "immigration",
        title: "Immigration Law",
        summary: "Visa applications, permits, and immigration legal services.",
    },
];

pub const OTHER_SERVICE_ID: &str = "other";
pub const OTHER_SERVICE_LABEL: &str = "Other";

// Every value the contact form accepts for `service`, catch-all included.
pub const SERVICE_OPTION_VALUES: [&str; 11] = [
    "raf",
    "medical",
    "wills",
    "family",
    "civil",
    "criminal",
    "corporate",
    "labour",
    "eviction",
    "immigration",
    OTHER_SERVICE_ID,
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ServiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn service_options() -> Vec<ServiceOption> {
    SERVICES
        .iter()
        .map(|service| ServiceOption {
            value: service.id,
            label: service.title,
        })
        .collect()
}

pub fn service_options_with_other() -> Vec<ServiceOption> {
    let mut options = service_options();
    options.push(ServiceOption {
        value: OTHER_SERVICE_ID,
        label: OTHER_SERVICE_LABEL,
    });
    options
}

pub fn service_by_id(id: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|service| service.id == id)
}

pub fn featured_services(count: usize) -> &'static [Service] {
    &SERVICES[..count.min(SERVICES.len())]
}
