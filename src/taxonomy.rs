use crate::error::{DrebookError, Result};

/// Sign convention for a leaf group: revenue groups accumulate raw signed
/// amounts, expense-like groups accumulate absolute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSign {
    Revenue,
    Expense,
}

/// One node of the DRE statement. Leaf groups receive transactions; total
/// groups are computed from previously declared groups' totals.
#[derive(Clone)]
pub enum GroupDef {
    Leaf {
        order: u32,
        key: &'static str,
        display_name: &'static str,
        sign: GroupSign,
    },
    Total {
        order: u32,
        key: &'static str,
        display_name: &'static str,
        dependencies: &'static [&'static str],
        combine: fn(&[f64]) -> f64,
    },
}

impl GroupDef {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Leaf { key, .. } | Self::Total { key, .. } => key,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Leaf { display_name, .. } | Self::Total { display_name, .. } => display_name,
        }
    }

    pub fn order(&self) -> u32 {
        match self {
            Self::Leaf { order, .. } | Self::Total { order, .. } => *order,
        }
    }

    pub fn is_total(&self) -> bool {
        matches!(self, Self::Total { .. })
    }

    pub fn sign(&self) -> Option<GroupSign> {
        match self {
            Self::Leaf { sign, .. } => Some(*sign),
            Self::Total { .. } => None,
        }
    }
}

pub struct Taxonomy {
    groups: Vec<GroupDef>,
}

impl Taxonomy {
    /// Build a taxonomy, checking that total groups only reference groups
    /// declared before them. Declaration order is evaluation order.
    pub fn new(groups: Vec<GroupDef>) -> Result<Self> {
        let mut seen: Vec<&str> = Vec::new();
        for group in &groups {
            if let GroupDef::Total { dependencies, key, .. } = group {
                for dep in *dependencies {
                    if !seen.contains(dep) {
                        return Err(DrebookError::Other(format!(
                            "total group '{key}' references '{dep}' before it is defined"
                        )));
                    }
                }
            }
            seen.push(group.key());
        }
        Ok(Self { groups })
    }

    /// The fixed DRE structure: receita, deduções, receita líquida, outras
    /// receitas, CMV, lucro bruto, despesas, despesas com sócios,
    /// investimentos, lucro líquido.
    pub fn standard() -> Self {
        let groups = vec![
            GroupDef::Leaf {
                order: 1,
                key: "1. RECEITA",
                display_name: "RECEITA",
                sign: GroupSign::Revenue,
            },
            GroupDef::Leaf {
                order: 2,
                key: "2. (-) DEDUÇÕES DA RECEITA",
                display_name: "(-) DEDUÇÕES DA RECEITA",
                sign: GroupSign::Expense,
            },
            GroupDef::Total {
                order: 3,
                key: "3. (=) RECEITA LÍQUIDA",
                display_name: "(=) RECEITA LÍQUIDA",
                dependencies: &["1. RECEITA", "2. (-) DEDUÇÕES DA RECEITA"],
                combine: |v| v[0] - v[1],
            },
            GroupDef::Leaf {
                order: 4,
                key: "4. (+) OUTRAS RECEITAS OPERACIONAIS E NÃO OPERACIONAIS",
                display_name: "(+) OUTRAS RECEITAS OPERACIONAIS E NÃO OPERACIONAIS",
                sign: GroupSign::Revenue,
            },
            GroupDef::Leaf {
                order: 5,
                key: "5. (-) CUSTOS DAS MERCADORIAS VENDIDAS (CMV)",
                display_name: "(-) CUSTOS DAS MERCADORIAS VENDIDAS (CMV)",
                sign: GroupSign::Expense,
            },
            GroupDef::Total {
                order: 6,
                key: "6. (=) LUCRO BRUTO",
                display_name: "(=) LUCRO BRUTO",
                dependencies: &[
                    "3. (=) RECEITA LÍQUIDA",
                    "4. (+) OUTRAS RECEITAS OPERACIONAIS E NÃO OPERACIONAIS",
                    "5. (-) CUSTOS DAS MERCADORIAS VENDIDAS (CMV)",
                ],
                combine: |v| v[0] + v[1] - v[2],
            },
            GroupDef::Leaf {
                order: 7,
                key: "7. (-) DESPESAS OPERACIONAIS",
                display_name: "(-) DESPESAS OPERACIONAIS",
                sign: GroupSign::Expense,
            },
            GroupDef::Leaf {
                order: 8,
                key: "8. (-) DESPESAS COM SÓCIOS",
                display_name: "(-) DESPESAS COM SÓCIOS",
                sign: GroupSign::Expense,
            },
            GroupDef::Leaf {
                order: 9,
                key: "9. (-) INVESTIMENTOS",
                display_name: "(-) INVESTIMENTOS",
                sign: GroupSign::Expense,
            },
            GroupDef::Total {
                order: 10,
                key: "10. (=) LUCRO LÍQUIDO",
                display_name: "(=) LUCRO LÍQUIDO",
                dependencies: &[
                    "6. (=) LUCRO BRUTO",
                    "7. (-) DESPESAS OPERACIONAIS",
                    "8. (-) DESPESAS COM SÓCIOS",
                    "9. (-) INVESTIMENTOS",
                ],
                combine: |v| v[0] - v[1] - v[2] - v[3],
            },
        ];
        // The built-in structure is authored in dependency order.
        Self::new(groups).expect("standard taxonomy is ordered")
    }

    pub fn groups(&self) -> &[GroupDef] {
        &self.groups
    }

    pub fn leaf_groups(&self) -> impl Iterator<Item = &GroupDef> {
        self.groups.iter().filter(|g| !g.is_total())
    }

    pub fn by_key(&self, key: &str) -> Option<&GroupDef> {
        self.groups.iter().find(|g| g.key() == key)
    }

    pub fn by_display_name(&self, name: &str) -> Option<&GroupDef> {
        self.groups.iter().find(|g| g.display_name() == name)
    }

    /// Parse a `GROUP.Category` path as used in mappings, e.g.
    /// "RECEITA.PIX". The group part is a leaf group's display name.
    pub fn resolve_path(&self, path: &str) -> Result<(&'static str, String)> {
        // Display names contain no dots, so the first dot splits the path.
        let (group_part, category) = path
            .split_once('.')
            .ok_or_else(|| DrebookError::UnknownCategory(path.to_string()))?;
        let group = self
            .by_display_name(group_part)
            .ok_or_else(|| DrebookError::UnknownGroup(group_part.to_string()))?;
        if group.is_total() {
            return Err(DrebookError::UnknownGroup(format!(
                "{group_part} is a computed total, not a category group"
            )));
        }
        if category.is_empty() {
            return Err(DrebookError::UnknownCategory(path.to_string()));
        }
        Ok((group.key(), category.to_string()))
    }
}

/// Default leaf categories offered for each group when a database is
/// initialized. Users can trim this via `drebook categories`.
pub const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "1. RECEITA",
        &[
            "Dinheiro",
            "Cheque",
            "Boleto",
            "Transferência",
            "Cartão / Pix / TED",
            "PIX",
            "Ifood",
            "Outras Entradas",
        ],
    ),
    ("2. (-) DEDUÇÕES DA RECEITA", &["ISS", "ICMS", "PIS/COFINS"]),
    (
        "4. (+) OUTRAS RECEITAS OPERACIONAIS E NÃO OPERACIONAIS",
        &["Resgate de Aplicação", "Empréstimo", "Aporte de Sócio"],
    ),
    (
        "5. (-) CUSTOS DAS MERCADORIAS VENDIDAS (CMV)",
        &[
            "Insumos e ingredientes",
            "Doces",
            "Carnes",
            "Bebidas",
            "Vinho",
            "Chopp",
            "Hortifrúti",
            "Café",
        ],
    ),
    (
        "7. (-) DESPESAS OPERACIONAIS",
        &[
            "DAS",
            "Contabilidade",
            "Consultoria / Assessoria",
            "Advogado",
            "Segurança",
            "Sistema",
            "Despesa Bancária",
            "Despesa Financeira",
            "Correio / Cartório",
            "Outras Despesas ADM",
            "Aluguel",
            "Condomínio",
            "Energia Elétrica",
            "Gás",
            "Água / Esgoto",
            "Internet",
            "Telefone e TV a Cabo",
            "Estacionamento",
            "Equipamentos",
            "Informática",
            "Predial",
            "Móveis e Utensílios",
            "Dedetização",
            "Propaganda e Publicidade",
            "Serviços Gráficos",
            "Material de Escritório",
            "Embalagem / Descartáveis",
            "Limpeza / Higiene",
            "Materiais de Reposição",
            "Salário",
            "Adiantamento",
            "Free-lance / Taxa",
            "13º Salário",
            "Férias + Abono",
            "Rescisão Contratual",
            "Vale Transporte",
            "Exame Médico",
            "FGTS",
            "Contribuição Sindical",
            "Refeição Funcionário",
            "INSS",
            "Treinamento",
            "Uniforme",
            "Farmácia",
            "Outras Despesas RH",
            "Locação de Equipamentos",
        ],
    ),
    (
        "8. (-) DESPESAS COM SÓCIOS",
        &["Despesas de Sócios", "Pró-labore", "Imposto de Renda Pessoa Física"],
    ),
    (
        "9. (-) INVESTIMENTOS",
        &["Obras e Instalações", "Informática", "Equipamentos / Aplicações em Fundos"],
    ),
];
