//! Document model for event reports and guides

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    client::Client,
    enums::EventType,
    event::{Event, EventDetails},
    material::EventConsumable,
    report::{GuideItem, RecentDamage},
};

const DATE_FORMAT: &str = "%d/%m/%Y";
const DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";
const NOT_INFORMED: &str = "Not informed";

/// One printable element
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(String),
    /// Label/value pairs printed as "Label: value"
    Fields(Vec<(String, String)>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Signature lines with the caption under each
    Signatures(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: Option<String>,
    pub blocks: Vec<Block>,
}

impl Section {
    fn titled(title: &str, blocks: Vec<Block>) -> Self {
        Self {
            title: Some(title.to_string()),
            blocks,
        }
    }

    fn untitled(blocks: Vec<Block>) -> Self {
        Self { title: None, blocks }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub subtitle: Option<String>,
    pub sections: Vec<Section>,
    /// Suggested attachment name, ends with ".pdf"
    pub file_name: String,
}

impl ReportDocument {
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.title.as_deref() == Some(title))
    }
}

fn field(label: &str, value: impl Into<String>) -> (String, String) {
    (label.to_string(), value.into())
}

fn or_not_informed(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_INFORMED.to_string(),
    }
}

fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| NOT_INFORMED.to_string())
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|h| h.to_string()).collect()
}

/// Keep file names portable
fn file_name(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("_");
    format!("{}.pdf", joined)
}

/// Name printed on guides: the event name, otherwise its type
fn operation_label(event: &Event) -> String {
    match event.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => event.event_type.label().to_string(),
    }
}

/// Complete report of one event
pub fn event_report(details: &EventDetails) -> ReportDocument {
    let event = &details.event;
    let (title, subtitle, prefix) = if event.event_type == EventType::Own {
        let name = event
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Unnamed event".to_string());
        ("Full Event Report".to_string(), name.clone(), name)
    } else {
        let label = event.event_type.label().to_string();
        (label.clone(), format!("For: {}", details.client.company), label)
    };

    let mut dates = Vec::new();
    if event.assembly_date.is_some() {
        dates.push(field("Assembly", date(event.assembly_date)));
    }
    dates.push(field("Start", date(Some(event.start_date))));
    if event.end_date.is_some() {
        dates.push(field("End / return", date(event.end_date)));
    }

    let mut general = vec![
        field("Client", details.client.company.clone()),
        field("Location", or_not_informed(event.location.as_deref())),
        field("Status", event.status.label()),
    ];
    if let Some(contact) = event.site_contact_name.as_deref().filter(|c| !c.trim().is_empty()) {
        let phone = event
            .site_contact_phone
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or("no contact");
        general.push(field("On-site contact", format!("{} ({})", contact, phone)));
    }
    if let Some(leader) = &details.team_leader {
        general.push(field("Team leader", leader.name.clone()));
    }

    let mut technical = vec![
        field(
            "Power type",
            event.power_type.map(|p| p.label().to_string()).unwrap_or_else(|| NOT_INFORMED.to_string()),
        ),
        field("Distance to power (m)", event.power_distance_m.to_string()),
        field(
            "Vehicle access",
            event.vehicle_access.map(|v| v.label().to_string()).unwrap_or_else(|| NOT_INFORMED.to_string()),
        ),
        field("Needs generator", if event.needs_generator { "Yes" } else { "No" }),
    ];
    if let Some(notes) = event.technical_notes.as_deref().filter(|n| !n.trim().is_empty()) {
        technical.push(field("Notes", notes));
    }

    let mut sections = vec![
        Section::untitled(vec![Block::Fields(dates)]),
        Section::titled("General Information", vec![Block::Fields(general)]),
        Section::titled("Technical Details", vec![Block::Fields(technical)]),
    ];

    if !details.photos.is_empty() {
        let rows = details
            .photos
            .iter()
            .map(|p| {
                vec![
                    p.file_name.clone(),
                    p.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        sections.push(Section::titled(
            "Site Photos",
            vec![Block::Table { headers: headers(&["File", "Description"]), rows }],
        ));
    }

    if !details.materials.is_empty() {
        let rows = details
            .materials
            .iter()
            .map(|m| vec![m.material.label(), m.material.quantity.to_string()])
            .collect();
        sections.push(Section::titled(
            "Material List",
            vec![Block::Table { headers: headers(&["Item / Model", "Qty"]), rows }],
        ));
    }

    if !details.consumables.is_empty() {
        sections.push(Section::titled(
            "Consumables",
            vec![consumables_table(&details.consumables, true)],
        ));
    }

    if !details.crew.is_empty() {
        let rows = details
            .crew
            .iter()
            .map(|s| vec![s.name.clone(), s.function.clone().unwrap_or_default()])
            .collect();
        sections.push(Section::titled(
            "Assigned Crew",
            vec![Block::Table { headers: headers(&["Name", "Function"]), rows }],
        ));
    }

    if !details.vehicles.is_empty() {
        let rows = details
            .vehicles
            .iter()
            .map(|v| vec![v.name.clone(), v.plate.clone()])
            .collect();
        sections.push(Section::titled(
            "Assigned Vehicles",
            vec![Block::Table { headers: headers(&["Vehicle", "Plate"]), rows }],
        ));
    }

    ReportDocument {
        title,
        subtitle: Some(subtitle),
        sections,
        file_name: file_name(&[&prefix, &event.id.to_string()]),
    }
}

fn consumables_table(consumables: &[EventConsumable], with_unit: bool) -> Block {
    let rows = consumables
        .iter()
        .map(|c| {
            let mut row = vec![c.consumable_name.clone(), c.quantity.to_string()];
            if with_unit {
                row.push(c.unit.clone());
            }
            row
        })
        .collect();
    let names: &[&str] = if with_unit { &["Item", "Qty", "Unit"] } else { &["Item", "Qty"] };
    Block::Table { headers: headers(names), rows }
}

fn guide_table(items: &[GuideItem]) -> Block {
    Block::Table {
        headers: headers(&["Item / Model", "Quantity"]),
        rows: items
            .iter()
            .map(|i| vec![i.model.clone(), i.quantity.to_string()])
            .collect(),
    }
}

fn signatures() -> Block {
    Block::Signatures(vec![
        "Checked by (Novalite)".to_string(),
        "Received by (Client / Production)".to_string(),
    ])
}

/// Guide listing the material leaving the warehouse
pub fn dispatch_guide(
    event: &Event,
    client: &Client,
    items: &[GuideItem],
    consumables: &[EventConsumable],
    issued_at: DateTime<Utc>,
) -> ReportDocument {
    let mut header = vec![field("Client", client.company.clone())];
    if let Some(location) = event.location.as_deref().filter(|l| !l.trim().is_empty()) {
        header.push(field("Address / location", location));
    }
    header.push(field("Departure date", date(Some(event.start_date))));
    if event.end_date.is_some() {
        header.push(field("Expected return", date(event.end_date)));
    }
    header.push(field("Issued", issued_at.format(DATETIME_FORMAT).to_string()));

    let mut sections = vec![
        Section::untitled(vec![Block::Fields(header)]),
        Section::titled("Equipment", vec![guide_table(items)]),
    ];
    if !consumables.is_empty() {
        sections.push(Section::titled("Consumables", vec![consumables_table(consumables, false)]));
    }
    sections.push(Section::untitled(vec![signatures()]));

    ReportDocument {
        title: "Material Dispatch Guide".to_string(),
        subtitle: Some(format!("Operation: {}", operation_label(event))),
        sections,
        file_name: file_name(&[
            "Dispatch_Guide",
            &event.name.clone().unwrap_or_else(|| event.id.to_string()),
            &issued_at.format("%Y%m%d-%H%M").to_string(),
        ]),
    }
}

/// Guide for material sent out during a running event
pub fn reinforcement_guide(
    event: &Event,
    client: &Client,
    items: &[GuideItem],
    issued_at: DateTime<Utc>,
) -> ReportDocument {
    let header = vec![
        field("Client", client.company.clone()),
        field("Issued", issued_at.format(DATETIME_FORMAT).to_string()),
    ];

    ReportDocument {
        title: "Extra Material Dispatch Guide (Reinforcement)".to_string(),
        subtitle: Some(format!("Operation: {}", operation_label(event))),
        sections: vec![
            Section::untitled(vec![Block::Fields(header)]),
            Section::titled("Equipment", vec![guide_table(items)]),
            Section::untitled(vec![signatures()]),
        ],
        file_name: file_name(&[
            "Reinforcement_Guide",
            &event.name.clone().unwrap_or_else(|| event.id.to_string()),
            &issued_at.format("%Y%m%d-%H%M").to_string(),
        ]),
    }
}

/// Items that came back defective, broken or lost
pub fn damage_report(
    event: &Event,
    client: &Client,
    damages: &[RecentDamage],
    issued_at: DateTime<Utc>,
) -> ReportDocument {
    let header = vec![
        field("Client", client.company.clone()),
        field("Issued", issued_at.format(DATE_FORMAT).to_string()),
    ];
    let rows = damages
        .iter()
        .map(|d| {
            vec![
                d.item.clone(),
                d.quantity.to_string(),
                d.condition.label().to_string(),
                d.note.clone().filter(|n| !n.trim().is_empty()).unwrap_or_else(|| "None".to_string()),
            ]
        })
        .collect();

    ReportDocument {
        title: "Loss and Damage Report".to_string(),
        subtitle: Some(format!("Operation: {}", operation_label(event))),
        sections: vec![
            Section::untitled(vec![Block::Fields(header)]),
            Section::titled(
                "Damaged Items",
                vec![Block::Table {
                    headers: headers(&["Item / Model", "Qty", "Condition", "Note"]),
                    rows,
                }],
            ),
        ],
        file_name: file_name(&[
            "Damage_Report",
            event.name.as_deref().unwrap_or_default(),
            &event.id.to_string(),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        enums::{EventStatus, ReturnCondition, StaffKind},
        staff::Staff,
    };

    fn client() -> Client {
        Client {
            id: 3,
            company: "Acme Stages".to_string(),
            representative: "Dana".to_string(),
            address: None,
            email: None,
            phone: None,
            representative_phone: None,
        }
    }

    fn event(event_type: EventType, name: Option<&str>) -> Event {
        let now = Utc::now();
        Event {
            id: 42,
            status: EventStatus::Planning,
            event_type,
            name: name.map(str::to_string),
            location: Some("Main hall".to_string()),
            client_id: 3,
            site_contact_name: None,
            site_contact_phone: None,
            assembly_date: None,
            start_date: NaiveDate::from_ymd_opt(2026, 6, 12).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 14),
            created_at: now,
            modified_at: now,
            correction_note: None,
            power_type: None,
            power_distance_m: 0,
            vehicle_access: None,
            needs_generator: false,
            technical_notes: None,
            cancellation_reason: None,
            created_by: None,
            team_leader_id: None,
        }
    }

    fn details(event: Event) -> EventDetails {
        EventDetails {
            event,
            client: client(),
            team_leader: None,
            crew: vec![Staff {
                id: 1,
                name: "Robin".to_string(),
                function: Some("Rigger".to_string()),
                kind: StaffKind::Employee,
                email: None,
                contact: None,
            }],
            vehicles: vec![],
            materials: vec![],
            consumables: vec![],
            photos: vec![],
            attendance: vec![],
            addenda: vec![],
            has_damage: false,
        }
    }

    #[test]
    fn test_own_event_title_uses_name() {
        let doc = event_report(&details(event(EventType::Own, Some("Spring Gala"))));
        assert_eq!(doc.title, "Full Event Report");
        assert_eq!(doc.subtitle.as_deref(), Some("Spring Gala"));
        assert_eq!(doc.file_name, "Spring_Gala_42.pdf");
    }

    #[test]
    fn test_sublease_title_names_client() {
        let doc = event_report(&details(event(EventType::Sublease, None)));
        assert_eq!(doc.title, "Sublease");
        assert_eq!(doc.subtitle.as_deref(), Some("For: Acme Stages"));
        assert_eq!(doc.file_name, "Sublease_42.pdf");
    }

    #[test]
    fn test_empty_lists_are_omitted() {
        let doc = event_report(&details(event(EventType::Own, Some("Gala"))));
        assert!(doc.section("Assigned Crew").is_some());
        assert!(doc.section("Assigned Vehicles").is_none());
        assert!(doc.section("Material List").is_none());
        assert!(doc.section("Technical Details").is_some());
    }

    #[test]
    fn test_dispatch_guide_lists_items_and_signatures() {
        let items = vec![
            GuideItem { model: "Par LED 18x10".to_string(), quantity: 8 },
            GuideItem { model: "DMX cable 10m".to_string(), quantity: 12 },
        ];
        let issued = Utc::now();
        let doc = dispatch_guide(&event(EventType::Own, Some("Gala")), &client(), &items, &[], issued);

        assert_eq!(doc.subtitle.as_deref(), Some("Operation: Gala"));
        let equipment = doc.section("Equipment").unwrap();
        match &equipment.blocks[0] {
            Block::Table { rows, .. } => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[1], vec!["DMX cable 10m".to_string(), "12".to_string()]);
            }
            other => panic!("unexpected block {:?}", other),
        }
        assert!(doc.section("Consumables").is_none());
        assert!(matches!(
            doc.sections.last().unwrap().blocks[0],
            Block::Signatures(_)
        ));
        assert!(doc.file_name.starts_with("Dispatch_Guide_Gala_"));
    }

    #[test]
    fn test_damage_report_rows() {
        let damages = vec![RecentDamage {
            returned_item_id: 1,
            event_id: 42,
            event_name: None,
            item: "Moving head".to_string(),
            quantity: 2,
            condition: ReturnCondition::Broken,
            note: None,
            returned_at: Utc::now(),
        }];
        let doc = damage_report(&event(EventType::Loan, None), &client(), &damages, Utc::now());
        assert_eq!(doc.subtitle.as_deref(), Some("Operation: Loan"));
        match &doc.section("Damaged Items").unwrap().blocks[0] {
            Block::Table { rows, .. } => {
                assert_eq!(rows[0], vec!["Moving head", "2", "Broken", "None"]);
            }
            other => panic!("unexpected block {:?}", other),
        }
        assert_eq!(doc.file_name, "Damage_Report_42.pdf");
    }
}
