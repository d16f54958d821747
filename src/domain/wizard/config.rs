//! Wizard questions per project type. Changing what visitors are asked means
//! editing these tables, not the wizard engine.

use crate::domain::project_type::ProjectType;
use crate::domain::wizard::{Bound, FieldKind, FieldOption, WizardField, WizardStep};

/// Options are written as struct literals so the arrays promote to `'static`.
macro_rules! option {
    ($value:expr, $label:expr) => {
        FieldOption {
            value: $value,
            label: $label,
        }
    };
}

const fn number(min: f64, max: f64) -> FieldKind {
    FieldKind::Number {
        min: Some(Bound::Fixed(min)),
        max: Some(Bound::Fixed(max)),
    }
}

const fn text(id: &'static str, label: &'static str) -> WizardField {
    WizardField::new(id, label, FieldKind::Text)
}

const fn email(label: &'static str) -> WizardField {
    WizardField::new("email", label, FieldKind::Email).required()
}

const fn full_name() -> WizardField {
    text("fullName", "Ime i prezime").required()
}

const fn attachments(label: &'static str) -> WizardField {
    WizardField::new("attachments", label, FieldKind::File)
}

const HOUSE: &[WizardStep] = &[
    WizardStep {
        id: "house-basic",
        title: "Osnovne informacije o kući",
        fields: &[
            text("location", "Lokacija objekta")
                .required()
                .placeholder("Grad / opština"),
            WizardField::new("area", "Približna bruto površina (m²)", number(30.0, 1000.0))
                .required()
                .placeholder("npr. 180"),
            WizardField::new(
                "floors",
                "Broj etaža",
                FieldKind::Select {
                    options: &[
                        option!("ground", "Prizemlje"),
                        option!("ground-plus-one", "P+1"),
                        option!("ground-plus-two", "P+2"),
                    ],
                },
            )
            .required(),
        ],
    },
    WizardStep {
        id: "house-scope",
        title: "Obim usluge",
        fields: &[
            WizardField::new(
                "services",
                "Šta vam je potrebno?",
                FieldKind::Checkbox {
                    options: &[
                        option!("concept", "Idejno rješenje"),
                        option!("main-project", "Glavni projekat"),
                        option!("supervision", "Stručni nadzor"),
                        option!("interior", "Enterijer"),
                    ],
                },
            )
            .required(),
            WizardField::new(
                "timeline",
                "Željeni rok",
                FieldKind::Select {
                    options: &[
                        option!("flexible", "Fleksibilno"),
                        option!("3-months", "Do 3 mjeseca"),
                        option!("6-months", "3–6 mjeseci"),
                    ],
                },
            )
            .required(),
        ],
    },
    WizardStep {
        id: "house-contact",
        title: "Kontakt podaci",
        fields: &[
            full_name(),
            email("Email adresa").placeholder("ime@domen.com"),
            text("phone", "Broj telefona").placeholder("+387..."),
            WizardField::new("notes", "Dodatne napomene", FieldKind::Textarea)
                .placeholder("Npr. specifične želje, referentni primjeri..."),
            attachments("Prilozi (skice, situacija, referentne slike)")
                .help_text("Opcionalno – možete dodati PDF, slike ili DWG fajlove."),
        ],
    },
];

const BUILDING: &[WizardStep] = &[
    WizardStep {
        id: "building-basic",
        title: "Osnovne informacije o zgradi",
        fields: &[
            text("location", "Lokacija objekta").required(),
            WizardField::new("units", "Broj stambenih jedinica", number(2.0, 200.0)).required(),
            WizardField::new(
                "program",
                "Namjena",
                FieldKind::Select {
                    options: &[
                        option!("residential", "Stambena"),
                        option!("mixed", "Stambeno-poslovna"),
                        option!("office", "Poslovna"),
                    ],
                },
            )
            .required(),
        ],
    },
    WizardStep {
        id: "building-scope",
        title: "Obim angažmana",
        fields: &[
            WizardField::new(
                "services",
                "Usluge koje su vam potrebne",
                FieldKind::Checkbox {
                    options: &[
                        option!("concept", "Idejno rješenje"),
                        option!("main-project", "Glavni projekat"),
                        option!("tender-docs", "Tenderska dokumentacija"),
                        option!("supervision", "Stručni nadzor"),
                    ],
                },
            )
            .required(),
            WizardField::new("deadline", "Očekivani rok izrade", FieldKind::Date),
        ],
    },
    WizardStep {
        id: "building-contact",
        title: "Kontakt podaci",
        fields: &[
            text("company", "Naziv firme / investitora").required(),
            text("contactPerson", "Kontakt osoba").required(),
            email("Email"),
            attachments("Urbanistički uslovi / postojeća dokumentacija"),
        ],
    },
];

const COMMERCIAL: &[WizardStep] = &[
    WizardStep {
        id: "commercial-basic",
        title: "Poslovni objekat – osnovne informacije",
        fields: &[
            text("location", "Lokacija").required(),
            WizardField::new(
                "program",
                "Vrsta poslovnog objekta",
                FieldKind::Select {
                    options: &[
                        option!("office", "Kancelarije"),
                        option!("retail", "Maloprodaja"),
                        option!("mixed", "Mješovita namjena"),
                    ],
                },
            )
            .required(),
            WizardField::new("area", "Površina (m²)", number(50.0, 5000.0)).required(),
        ],
    },
    WizardStep {
        id: "commercial-contact",
        title: "Kontakt i detalji",
        fields: &[
            text("company", "Naziv firme").required(),
            email("Email"),
            WizardField::new("notes", "Dodatne informacije", FieldKind::Textarea),
        ],
    },
];

const INTERIOR: &[WizardStep] = &[
    WizardStep {
        id: "interior-basic",
        title: "Osnovne informacije o enterijeru",
        fields: &[
            WizardField::new(
                "spaceType",
                "Tip prostora",
                FieldKind::Select {
                    options: &[
                        option!("apartment", "Stan"),
                        option!("house", "Kuća"),
                        option!("office", "Kancelarija"),
                        option!("retail", "Prodajni prostor"),
                    ],
                },
            )
            .required(),
            WizardField::new("area", "Površina (m²)", number(20.0, 1000.0)).required(),
            text("style", "Željeni stil")
                .placeholder("Npr. minimalizam, skandinavski, industrijski..."),
        ],
    },
    WizardStep {
        id: "interior-scope",
        title: "Obim usluge enterijera",
        fields: &[
            WizardField::new(
                "services",
                "Izaberite usluge",
                FieldKind::Checkbox {
                    options: &[
                        option!("concept", "Idejni koncept"),
                        option!("technical", "Tehnička razrada"),
                        option!("3d", "3D vizualizacije"),
                    ],
                },
            )
            .required(),
            attachments("Tlocrt / postojeće stanje"),
        ],
    },
    WizardStep {
        id: "interior-contact",
        title: "Kontakt podaci",
        fields: &[full_name(), email("Email"), text("phone", "Telefon")],
    },
];

const RECONSTRUCTION: &[WizardStep] = &[
    WizardStep {
        id: "reconstruction-basic",
        title: "Informacije o postojećem objektu",
        fields: &[
            WizardField::new(
                "year",
                "Godina izgradnje (približno)",
                FieldKind::Number {
                    min: Some(Bound::Fixed(1900.0)),
                    max: Some(Bound::CurrentYear),
                },
            ),
            WizardField::new(
                "scope",
                "Obim rekonstrukcije",
                FieldKind::Select {
                    options: &[
                        option!("partial", "Djelimična rekonstrukcija"),
                        option!("complete", "Potpuna rekonstrukcija"),
                    ],
                },
            )
            .required(),
            WizardField::new("goals", "Glavni ciljevi", FieldKind::Textarea)
                .required()
                .placeholder("Npr. energetska efikasnost, proširenje, funkcionalnost..."),
        ],
    },
    WizardStep {
        id: "reconstruction-contact",
        title: "Kontakt podaci",
        fields: &[full_name(), email("Email")],
    },
];

const VISUALIZATION: &[WizardStep] = &[
    WizardStep {
        id: "visualization-basic",
        title: "3D vizualizacija – osnovne informacije",
        fields: &[
            WizardField::new(
                "projectStatus",
                "Status projekta",
                FieldKind::Radio {
                    options: &[
                        option!("have-model", "Imam gotov 3D model"),
                        option!("need-model", "Treba izraditi model"),
                    ],
                },
            )
            .required(),
            WizardField::new("views", "Broj željenih prikaza", number(1.0, 20.0)).required(),
            attachments("Referentne slike / nacrti"),
        ],
    },
    WizardStep {
        id: "visualization-contact",
        title: "Kontakt podaci",
        fields: &[full_name(), email("Email")],
    },
];

/// Ordered wizard steps for a project type.
pub fn steps_for(project_type: ProjectType) -> &'static [WizardStep] {
    match project_type {
        ProjectType::House => HOUSE,
        ProjectType::Building => BUILDING,
        ProjectType::Commercial => COMMERCIAL,
        ProjectType::Interior => INTERIOR,
        ProjectType::Reconstruction => RECONSTRUCTION,
        ProjectType::Visualization => VISUALIZATION,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_type_has_steps_ending_with_contact_email() {
        for project_type in ProjectType::ALL {
            let steps = steps_for(project_type);
            assert!(steps.len() >= 2, "{project_type} has too few steps");
            let last = steps.last().unwrap();
            let email = last.field("email").expect("contact step asks for email");
            assert!(email.required);
            assert_eq!(email.kind, FieldKind::Email);
        }
    }

    #[test]
    fn field_ids_are_unique_per_type() {
        for project_type in ProjectType::ALL {
            let mut seen = HashSet::new();
            for field in steps_for(project_type).iter().flat_map(|step| step.fields) {
                assert!(seen.insert(field.id), "duplicate {} in {project_type}", field.id);
            }
        }
    }

    #[test]
    fn choice_fields_offer_options() {
        for project_type in ProjectType::ALL {
            for field in steps_for(project_type).iter().flat_map(|step| step.fields) {
                if matches!(
                    field.kind,
                    FieldKind::Select { .. } | FieldKind::Radio { .. } | FieldKind::Checkbox { .. }
                ) {
                    assert!(!field.kind.options().is_empty(), "{} has no options", field.id);
                }
            }
        }
    }

    #[test]
    fn house_has_three_steps() {
        let ids: Vec<_> = steps_for(ProjectType::House).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["house-basic", "house-scope", "house-contact"]);
    }
}
