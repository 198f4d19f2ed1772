//! Curated catalog of AEM documentation entry points

use crate::types::ServiceInfo;
use tracing::debug;

/// Static catalog entry
#[derive(Debug, Clone, Copy)]
struct Service {
    name: &'static str,
    url: &'static str,
    description: &'static str,
    category: &'static str,
}

/// Catalog categories
pub const CATEGORIES: &[&str] = &["cloud-service", "on-premise", "apis", "tools", "learning"];

const SERVICES: &[Service] = &[
    Service {
        name: "AEM as a Cloud Service - Overview",
        url: "https://experienceleague.adobe.com/en/docs/experience-manager-cloud-service/content/overview/introduction",
        description: "Introduction and overview of Adobe Experience Manager as a Cloud Service",
        category: "cloud-service",
    },
    Service {
        name: "AEM Cloud Service - Release Notes",
        url: "https://experienceleague.adobe.com/en/docs/experience-manager-cloud-service/content/release-notes/cloud-manager/current",
        description: "Current release notes for AEM Cloud Manager",
        category: "cloud-service",
    },
    Service {
        name: "AEM Sites Optimizer",
        url: "https://experienceleague.adobe.com/en/docs/experience-manager-sites-optimizer/content/home",
        description: "Adobe Experience Manager Sites Optimizer documentation",
        category: "cloud-service",
    },
    Service {
        name: "AEM 6.5 LTS Documentation",
        url: "https://experienceleague.adobe.com/en/docs/experience-manager-65-lts",
        description: "Adobe Experience Manager 6.5 Long Term Support documentation",
        category: "on-premise",
    },
    Service {
        name: "AEM 6.5 Documentation",
        url: "https://experienceleague.adobe.com/en/docs/experience-manager-65",
        description: "Complete documentation for Adobe Experience Manager 6.5",
        category: "on-premise",
    },
    Service {
        name: "AEM APIs and Events",
        url: "https://developer.adobe.com/experience-cloud/experience-manager-apis/guides/events/",
        description: "Adobe Experience Manager APIs and event-driven architecture guides",
        category: "apis",
    },
    Service {
        name: "AEM Developer Documentation",
        url: "https://developer.adobe.com/experience-cloud/experience-manager-apis/guides/",
        description: "Complete developer guides for AEM APIs and integrations",
        category: "apis",
    },
    Service {
        name: "AEM Cloud Service Security Best Practices",
        url: "https://experienceleague.adobe.com/en/docs/experience-manager-cloud-service/content/security/best-practices-for-sling-service-user-mapping-and-service-user-definition",
        description: "Security best practices for Sling Service User mapping and definition",
        category: "cloud-service",
    },
    Service {
        name: "AEM Documentation Browse",
        url: "https://experienceleague.adobe.com/en/browse/experience-manager",
        description: "Browse all Adobe Experience Manager documentation",
        category: "learning",
    },
    Service {
        name: "Adobe AI Documentation",
        url: "https://experienceleague.adobe.com/en/docs/ai",
        description: "Adobe AI and machine learning documentation",
        category: "tools",
    },
    Service {
        name: "AEM Project Archetype (GitHub)",
        url: "https://github.com/adobe/aem-project-archetype",
        description: "Maven template for AEM projects with best practices",
        category: "tools",
    },
    Service {
        name: "AEM Core WCM Components (GitHub)",
        url: "https://github.com/adobe/aem-core-wcm-components",
        description: "Standardized Web Content Management components for AEM",
        category: "tools",
    },
    Service {
        name: "ACS AEM Commons (GitHub)",
        url: "https://github.com/Adobe-Consulting-Services/acs-aem-commons",
        description: "ACS AEM Commons - Collection of reusable AEM components and utilities",
        category: "tools",
    },
    Service {
        name: "ACS AEM Commons Documentation",
        url: "https://adobe-consulting-services.github.io/acs-aem-commons/",
        description: "Official documentation for ACS AEM Commons library",
        category: "tools",
    },
    Service {
        name: "Netcentric AEM Tools (GitHub)",
        url: "https://github.com/Netcentric",
        description: "Netcentric open source AEM tools and frameworks",
        category: "tools",
    },
    Service {
        name: "AEM Multi-Tenant Demo (GitHub)",
        url: "https://github.com/Netcentric/aem-multitenant-demo",
        description: "Multi-tenancy implementation example for AEM",
        category: "tools",
    },
    Service {
        name: "Coral UI 3 Reference (AEM 6.5)",
        url: "https://developer.adobe.com/experience-manager/reference-materials/6-5/coral-ui/coralui3/index.html",
        description: "Coral UI 3 component library reference for AEM 6.5",
        category: "tools",
    },
    Service {
        name: "Apache Sling Models",
        url: "https://sling.apache.org/documentation/bundles/models.html",
        description: "Apache Sling Models documentation - AEM foundation framework",
        category: "apis",
    },
    Service {
        name: "Apache Sling Servlets",
        url: "https://sling.apache.org/documentation/the-sling-engine/servlets.html",
        description: "Apache Sling Servlets documentation for AEM development",
        category: "apis",
    },
    Service {
        name: "Apache Sling Eventing and Job Handling",
        url: "https://sling.apache.org/documentation/bundles/apache-sling-eventing-and-job-handling.html",
        description: "Event-driven programming and job handling in Sling/AEM",
        category: "apis",
    },
    Service {
        name: "adaptTo() 2025 Conference",
        url: "https://adapt.to/2025/",
        description: "adaptTo() conference - AEM developer community event",
        category: "learning",
    },
    Service {
        name: "adaptTo() 2025 Schedule",
        url: "https://adapt.to/2025/schedule",
        description: "Full schedule of adaptTo() 2025 conference sessions",
        category: "learning",
    },
    Service {
        name: "adaptTo() 2024 Schedule",
        url: "https://adapt.to/2024/schedule",
        description: "adaptTo() 2024 conference sessions and schedule",
        category: "learning",
    },
    Service {
        name: "adaptTo() 2023 Schedule",
        url: "https://adapt.to/2023/schedule",
        description: "adaptTo() 2023 conference sessions and schedule",
        category: "learning",
    },
    Service {
        name: "adaptTo() Historical Archives",
        url: "https://adapt.to/2012/schedule",
        description: "Historical adaptTo() conferences (2011-2019) - community archives",
        category: "learning",
    },
    Service {
        name: "Adobe Summit",
        url: "https://business.adobe.com/summit/adobe-summit.html",
        description: "Adobe Summit - The Digital Experience Conference",
        category: "learning",
    },
    Service {
        name: "Adobe Developers YouTube Channel",
        url: "https://www.youtube.com/@AdobeDevelopers",
        description: "Official Adobe Developers YouTube channel with tutorials and talks",
        category: "learning",
    },
    Service {
        name: "AEM User Group YouTube Channel",
        url: "https://www.youtube.com/@adobeexperiencemanageruser7261",
        description: "Adobe Experience Manager User Group community channel",
        category: "learning",
    },
];

/// List the curated documentation areas in catalog order
pub fn available_services() -> Vec<ServiceInfo> {
    debug!(count = SERVICES.len(), "Listing available services");
    SERVICES
        .iter()
        .map(|s| ServiceInfo {
            name: s.name.to_string(),
            url: s.url.to_string(),
            description: s.description.to_string(),
            category: s.category.to_string(),
        })
        .collect()
}
