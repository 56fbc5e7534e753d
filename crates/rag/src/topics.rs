//! Topic boost rules
//!
//! The registry below encodes the sales playbook: which knowledge documents
//! must win for which kinds of questions, independent of raw similarity.
//! Registry order IS priority order. Walking stops at the first matching
//! short-circuit rule; reorder rules move their documents to the front and
//! let the walk continue.
//!
//! Trigger phrases are substring needles tested against the loose-normalized
//! query (lowercase, diacritics stripped, punctuation collapsed), so they
//! keep stopwords: "quem e o professor", not a stem list.

use smartzap_core::{FunnelStage, RankedChunk};

use crate::stage_gate::STRICT_PRICE_SOURCES;

/// How a matching rule resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostMode {
    /// Promote the rule's sources, filter, truncate, return immediately
    ShortCircuit,
    /// Promote the rule's sources in place and keep walking the registry
    Reorder,
    /// The stateful social-proof follow-up; resolution depends on history
    /// and funnel stage
    ProofFollowUp,
}

/// One entry of the playbook
#[derive(Debug, Clone, Copy)]
pub struct TopicRule {
    pub name: &'static str,
    pub mode: BoostMode,
    /// Any of these contained in the loose query fires the rule
    pub triggers: &'static [&'static str],
    /// Any of these contained in the loose query vetoes the rule
    pub excludes: &'static [&'static str],
    /// Documents this rule promotes
    pub sources: &'static [&'static str],
    /// Similarity threshold override for the short-circuit result
    pub min_similarity: Option<f32>,
    /// Minimum context budget when this topic is in play
    pub context_floor: Option<usize>,
    /// Rule only fires when the stage permits offer talk
    pub offer_stage_only: bool,
}

impl TopicRule {
    /// Substring trigger test against the loose-normalized query
    pub fn matches_query(&self, loose_query: &str) -> bool {
        self.triggers.iter().any(|t| loose_query.contains(t))
            && !self.excludes.iter().any(|t| loose_query.contains(t))
    }
}

pub const RULE_PROVA_SOCIAL: &str = "prova_social";
pub const RULE_MAIS_PROVAS: &str = "mais_provas";

/// The in-chat testimonials document
pub const PROOF_SOURCE: &str = "provas_sociais";
/// The "see our external channels" document; only shown on a repeated ask
pub const PROOF_CHANNELS_SOURCE: &str = "provas_sociais_canais";

/// First-ask proof phrasing
const PROOF_TRIGGERS: &[&str] = &[
    "depoimento",
    "provas",
    "prova social",
    "resultados de alunos",
    "resultado de alunos",
    "casos de sucesso",
    "caso de sucesso",
    "alguem ja fez",
    "quem ja fez",
    "ja fez o curso",
    "funciona mesmo",
    "realmente funciona",
    "tem resultado",
];

/// Repeat-ask proof phrasing; owned by `mais_provas`, vetoed in `prova_social`
const MORE_PROOF_TRIGGERS: &[&str] = &[
    "mais provas",
    "mais depoimento",
    "outros depoimentos",
    "outro depoimento",
    "mais resultados",
    "outros resultados",
    "mais casos",
    "outros casos",
    "mais alunos",
    "outros alunos",
    "mais exemplos",
    "outros exemplos",
];

const BASE: TopicRule = TopicRule {
    name: "",
    mode: BoostMode::ShortCircuit,
    triggers: &[],
    excludes: &[],
    sources: &[],
    min_similarity: None,
    context_floor: None,
    offer_stage_only: false,
};

/// The playbook, in priority order
pub static RULES: &[TopicRule] = &[
    // Objections beat everything, including price questions phrased as
    // complaints. The low threshold keeps the objection document reachable
    // even on thin lexical overlap.
    TopicRule {
        name: "objecoes",
        triggers: &[
            "ta caro",
            "muito caro",
            "caro demais",
            "achei caro",
            "caro",
            "nao tenho dinheiro",
            "sem dinheiro",
            "nao posso pagar",
            "nao da pra pagar",
            "nao tenho condicoes",
            "vou pensar",
            "preciso pensar",
            "depois eu vejo",
            "nao sei se vale",
            "sera que vale",
            "vale a pena",
            "sera que funciona",
            "golpe",
            "desconfiado",
            "desconfiada",
            "nao confio",
            "arriscado",
        ],
        sources: &["objecoes_comuns"],
        min_similarity: Some(0.01),
        ..BASE
    },
    TopicRule {
        name: "preco_direto",
        triggers: &[
            "quanto custa",
            "quanto que custa",
            "quanto e o curso",
            "quanto fica",
            "quanto ta o curso",
            "quanto sai",
            "qual o valor",
            "qual valor",
            "qual e o valor",
            "qual o preco",
            "qual preco",
            "preco do curso",
            "valor do curso",
            "valor da pos",
            "qual o investimento",
        ],
        sources: STRICT_PRICE_SOURCES,
        ..BASE
    },
    TopicRule {
        name: "suporte",
        triggers: &[
            "suporte",
            "tirar duvida",
            "tenho duvida",
            "tenho uma duvida",
            "atendimento",
            "falar com alguem",
            "falar com voces",
            "canal de ajuda",
        ],
        sources: &["suporte_alunos"],
        ..BASE
    },
    TopicRule {
        name: "matricula",
        triggers: &[
            "como faco para entrar",
            "como entrar",
            "como me inscrevo",
            "como inscrever",
            "me inscrever",
            "fazer matricula",
            "minha matricula",
            "matricula",
            "inscricao",
            "como comprar",
            "quero comprar",
            "como adquirir",
            "garantir minha vaga",
            "como assinar",
            "quero me matricular",
        ],
        sources: &["matricula_acesso"],
        ..BASE
    },
    TopicRule {
        name: "formas_pagamento",
        triggers: &[
            "forma de pagamento",
            "formas de pagamento",
            "como pagar",
            "como posso pagar",
            "parcelar",
            "parcelamento",
            "parcela",
            "cartao",
            "boleto",
            "pix",
            "a vista",
            "em quantas vezes",
            "quantas vezes",
            "dividir",
        ],
        sources: STRICT_PRICE_SOURCES,
        ..BASE
    },
    TopicRule {
        name: "duracao_acesso",
        triggers: &[
            "quanto tempo de acesso",
            "tempo de acesso",
            "dura o acesso",
            "acesso vitalicio",
            "vitalicio",
            "quando expira",
            "expira",
            "perde o acesso",
            "validade do acesso",
            "acesso para sempre",
        ],
        sources: &["duracao_acesso"],
        ..BASE
    },
    TopicRule {
        name: "problemas_area",
        triggers: &[
            "minha area nao",
            "area nao da",
            "area saturada",
            "saturada",
            "saturado",
            "mercado saturado",
            "muita concorrencia",
            "concorrencia",
            "nao consigo clientes",
            "sem clientes",
            "falta de clientes",
            "area fraca",
        ],
        sources: &["problemas_areas"],
        ..BASE
    },
    // Generic money talk only becomes a price pitch once the funnel allows
    // an offer; before that the gate has already removed the documents and
    // this rule must not fire at all.
    TopicRule {
        name: "preco_geral",
        triggers: &[
            "pagamento",
            "pagar",
            "desconto",
            "mais barato",
            "barato",
            "condicao especial",
            "condicoes especiais",
            "promocao",
            "cupom",
            "valor final",
            "negociar",
        ],
        sources: STRICT_PRICE_SOURCES,
        offer_stage_only: true,
        ..BASE
    },
    TopicRule {
        name: "professor",
        triggers: &[
            "quem e o professor",
            "quem e o mentor",
            "quem ensina",
            "quem da as aulas",
            "quem da aula",
            "qual professor",
            "sobre o professor",
            "professor",
            "credencial",
            "curriculo",
            "quem criou",
            "quem e o fundador",
            "quem esta por tras",
        ],
        sources: &["professor_credenciais"],
        context_floor: Some(2000),
        ..BASE
    },
    TopicRule {
        name: "bonus",
        triggers: &[
            "bonus",
            "brinde",
            "o que vem junto",
            "vem junto",
            "o que esta incluso",
            "o que ta incluso",
            "incluso",
            "alem do curso",
            "material extra",
        ],
        sources: &["bonus_incluidos"],
        context_floor: Some(2000),
        ..BASE
    },
    TopicRule {
        name: "modalidade",
        triggers: &[
            "online",
            "presencial",
            "ead",
            "a distancia",
            "ao vivo",
            "gravado",
            "gravadas",
            "aulas gravadas",
            "assistir quando",
            "pelo celular",
            "modalidade",
        ],
        sources: &["modalidade_online"],
        context_floor: Some(1800),
        ..BASE
    },
    TopicRule {
        name: "pagina_vendas",
        triggers: &[
            "manda o link",
            "me manda o link",
            "link da pagina",
            "pagina de vendas",
            "site do curso",
            "link de compra",
            "link do curso",
            "manda o site",
            "onde compro",
            "onde eu compro",
            "quero ver a pagina",
        ],
        sources: &["pagina_vendas"],
        ..BASE
    },
    TopicRule {
        name: "resultados",
        triggers: &[
            "quanto vou ganhar",
            "quanto da pra ganhar",
            "quanto posso ganhar",
            "retorno",
            "faturamento",
            "quanto fatura",
            "renda extra",
            "aumentar a renda",
            "fonte de renda",
            "ganhar dinheiro",
            "viver de advocacia",
            "viver da advocacia",
            "recuperar o investimento",
        ],
        sources: &["resultados_financeiros"],
        context_floor: Some(2200),
        ..BASE
    },
    TopicRule {
        name: "area_atuacao",
        mode: BoostMode::Reorder,
        triggers: &[
            "qual area escolher",
            "que area escolher",
            "qual area seguir",
            "qual area devo",
            "area de atuacao",
            "qual especialidade",
            "qual ramo",
            "melhor area",
            "areas do direito",
            "qual area vale",
            "em qual area",
        ],
        sources: &["areas_atuacao"],
        context_floor: Some(2400),
        ..BASE
    },
    TopicRule {
        name: "nivel_experiencia",
        mode: BoostMode::Reorder,
        triggers: &[
            "sou iniciante",
            "iniciante",
            "recem formado",
            "recem formada",
            "acabei de me formar",
            "sou estudante",
            "ainda sou estudante",
            "ainda estudo",
            "nao tenho experiencia",
            "sem experiencia",
            "nunca atuei",
            "nunca advoguei",
            "nao tenho oab",
            "sem oab",
            "ainda nao passei na oab",
        ],
        sources: &["niveis_experiencia"],
        context_floor: Some(2400),
        ..BASE
    },
    TopicRule {
        name: "como_funciona",
        mode: BoostMode::Reorder,
        triggers: &[
            "como funciona",
            "como que funciona",
            "me explica",
            "explica como",
            "como e o metodo",
            "qual o metodo",
            "metodologia",
            "como sao as aulas",
            "como vou aprender",
            "na pratica",
            "passo a passo",
        ],
        sources: &["como_funciona"],
        context_floor: Some(2500),
        ..BASE
    },
    TopicRule {
        name: "carga_horaria",
        triggers: &[
            "carga horaria",
            "quantas horas",
            "horas de conteudo",
            "horas de aula",
            "duracao do curso",
            "quanto tempo de curso",
            "quanto tempo dura o curso",
            "quanto dura",
            "certificado de quantas horas",
            "horas no certificado",
        ],
        sources: &["carga_horaria"],
        ..BASE
    },
    TopicRule {
        name: "ansiedade_tempo",
        triggers: &[
            "nao tenho tempo",
            "pouco tempo",
            "sem tempo",
            "falta de tempo",
            "trabalho o dia todo",
            "trabalho muito",
            "rotina corrida",
            "consigo conciliar",
            "da para conciliar",
            "vou conseguir acompanhar",
            "no meu ritmo",
        ],
        sources: &["ansiedade_tempo", "duracao_acesso"],
        ..BASE
    },
    TopicRule {
        name: "iajur",
        triggers: &[
            "iajur",
            "ia jur",
            "ferramenta de peticao",
            "ia de peticao",
            "peticao com ia",
            "peticoes com ia",
            "ia juridica",
        ],
        sources: &["iajur_recursos"],
        ..BASE
    },
    TopicRule {
        name: "maria",
        triggers: &[
            "maria",
            "assistente maria",
            "ia maria",
            "falar com a maria",
        ],
        sources: &["maria_recursos"],
        ..BASE
    },
    TopicRule {
        name: "diferencial_ia",
        triggers: &[
            "chatgpt",
            "chat gpt",
            "gpt",
            "ja uso ia",
            "uso o chatgpt",
            "diferenca para o chat",
            "por que nao usar o chat",
            "ia gratuita",
            "ia de graca",
            "diferencial da ia",
        ],
        sources: &["diferencial_ia", "iajur_recursos", "maria_recursos"],
        ..BASE
    },
    TopicRule {
        name: "conteudo",
        triggers: &[
            "conteudo do curso",
            "qual o conteudo",
            "o que vou aprender",
            "o que vou estudar",
            "ementa",
            "grade do curso",
            "grade curricular",
            "quais modulos",
            "quais sao os modulos",
            "modulos do curso",
            "o que tem no curso",
            "o que tem dentro",
            "quais aulas",
            "o que ensina",
        ],
        sources: &["conteudo_programatico", "pagina_vendas"],
        ..BASE
    },
    TopicRule {
        name: RULE_PROVA_SOCIAL,
        triggers: PROOF_TRIGGERS,
        excludes: MORE_PROOF_TRIGGERS,
        sources: &[PROOF_SOURCE, "resultados_financeiros"],
        context_floor: Some(2500),
        ..BASE
    },
    TopicRule {
        name: RULE_MAIS_PROVAS,
        mode: BoostMode::ProofFollowUp,
        triggers: MORE_PROOF_TRIGGERS,
        sources: &[PROOF_CHANNELS_SOURCE],
        context_floor: Some(2500),
        ..BASE
    },
    TopicRule {
        name: "direcionamento",
        triggers: &[
            "o que eu faco",
            "o que devo fazer",
            "por onde comeco",
            "por onde comecar",
            "por onde eu comeco",
            "me diz o que fazer",
            "qual o primeiro passo",
            "primeiro passo",
            "me orienta",
            "preciso de direcao",
            "preciso de orientacao",
            "estou perdido",
            "estou perdida",
            "to perdido",
            "to perdida",
            "me guia",
        ],
        sources: &["direcionamento_estruturado"],
        min_similarity: Some(0.01),
        context_floor: Some(3000),
        ..BASE
    },
    // Emotional distress always answers with the care document, similarity
    // or not. Threshold zero means a zero-overlap message still returns it.
    TopicRule {
        name: "acolhimento",
        triggers: &[
            "desanimado",
            "desanimada",
            "desmotivado",
            "desmotivada",
            "frustrado",
            "frustrada",
            "nao aguento mais",
            "to cansado",
            "to cansada",
            "estou cansado",
            "estou cansada",
            "vontade de desistir",
            "penso em desistir",
            "pensando em desistir",
            "desistir da advocacia",
            "sem esperanca",
            "depressao",
            "ansiedade",
            "ansioso",
            "ansiosa",
            "to mal",
            "estou mal",
        ],
        sources: &["acolhimento_emocional"],
        min_similarity: Some(0.0),
        context_floor: Some(2800),
        ..BASE
    },
    TopicRule {
        name: "holding",
        triggers: &[
            "holding",
            "blindagem patrimonial",
            "blindagem",
            "protecao de patrimonio",
            "protecao patrimonial",
            "planejamento patrimonial",
            "empresa familiar",
            "proteger meu patrimonio",
            "proteger o patrimonio",
        ],
        sources: &["modulo_holding"],
        context_floor: Some(2600),
        ..BASE
    },
];

/// Inputs the cascade needs beyond the ranked list
#[derive(Debug, Clone)]
pub struct CascadeContext<'a> {
    /// Loose-normalized query
    pub loose_query: &'a str,
    /// Current funnel stage
    pub stage: Option<FunnelStage>,
    /// Whether an earlier user turn already asked for social proof
    pub prior_proof_request: bool,
    /// Default similarity threshold (rule overrides win)
    pub min_similarity: f32,
    /// Result size cap
    pub top_k: usize,
}

/// What the cascade decided
#[derive(Debug)]
pub struct CascadeOutcome {
    /// Final ranked chunks, thresholded and truncated
    pub chunks: Vec<RankedChunk>,
    /// Names of every rule that matched, reorders included
    pub matched: Vec<&'static str>,
    /// The rule that ended the walk, if any
    pub short_circuited: Option<&'static str>,
    /// Caller should record that this contact prefers proof via external
    /// channels
    pub prefer_proof_channels: bool,
}

/// Walk the registry over a ranked candidate list
///
/// `ranked` must be the full post-gate ranking, zero-similarity entries
/// included; thresholds only apply at the end of whichever path resolves
/// the query.
pub fn apply_rules(ranked: Vec<RankedChunk>, ctx: &CascadeContext) -> CascadeOutcome {
    let mut working = ranked;
    let mut matched: Vec<&'static str> = Vec::new();

    for rule in RULES {
        if !rule.matches_query(ctx.loose_query) {
            continue;
        }
        if rule.offer_stage_only && !stage_allows_offer_talk(ctx.stage) {
            continue;
        }
        matched.push(rule.name);

        match rule.mode {
            BoostMode::Reorder => {
                working = promote_sources(working, rule.sources);
            }
            BoostMode::ShortCircuit => {
                let mut chunks = promote_sources(working, rule.sources);
                // A first-ever proof request must not reveal the external
                // channels document; that reply is earned by asking twice.
                if rule.name == RULE_PROVA_SOCIAL && !ctx.prior_proof_request {
                    chunks.retain(|c| c.document.source != PROOF_CHANNELS_SOURCE);
                }
                let threshold = rule.min_similarity.unwrap_or(ctx.min_similarity);
                chunks.retain(|c| c.similarity >= threshold);
                chunks.truncate(ctx.top_k);
                return CascadeOutcome {
                    chunks,
                    matched,
                    short_circuited: Some(rule.name),
                    prefer_proof_channels: false,
                };
            }
            BoostMode::ProofFollowUp => {
                return resolve_proof_followup(working, rule, ctx, matched);
            }
        }
    }

    working.retain(|c| c.similarity >= ctx.min_similarity);
    working.truncate(ctx.top_k);
    CascadeOutcome {
        chunks: working,
        matched,
        short_circuited: None,
        prefer_proof_channels: false,
    }
}

/// Repeat proof asks resolve on history and stage, not on similarity
fn resolve_proof_followup(
    ranked: Vec<RankedChunk>,
    rule: &TopicRule,
    ctx: &CascadeContext,
    matched: Vec<&'static str>,
) -> CascadeOutcome {
    let threshold = rule.min_similarity.unwrap_or(ctx.min_similarity);

    if ctx.prior_proof_request {
        if ctx.stage.is_some_and(|s| s.is_detailed_offer()) {
            // The offer is on the table and the contact keeps stalling for
            // proof: answer with ONLY the external channels document and
            // remember the preference. No threshold; the document was
            // already gate-approved.
            let chunks: Vec<RankedChunk> = ranked
                .into_iter()
                .filter(|c| c.document.source == PROOF_CHANNELS_SOURCE)
                .collect();
            return CascadeOutcome {
                chunks,
                matched,
                short_circuited: Some(rule.name),
                prefer_proof_channels: true,
            };
        }

        // Earlier in the funnel: lead with the channels and testimonial
        // documents but keep the rest of the ranking behind them.
        let mut chunks = promote_sources(ranked, &[PROOF_CHANNELS_SOURCE, PROOF_SOURCE]);
        chunks.retain(|c| c.similarity >= threshold);
        chunks.truncate(ctx.top_k);
        return CascadeOutcome {
            chunks,
            matched,
            short_circuited: Some(rule.name),
            prefer_proof_channels: false,
        };
    }

    // "More proof" phrasing without any recorded first ask: treat it as the
    // first one. The channels document stays unseen.
    let mut chunks: Vec<RankedChunk> = ranked
        .into_iter()
        .filter(|c| c.document.source != PROOF_CHANNELS_SOURCE)
        .collect();
    chunks = promote_sources(chunks, &[PROOF_SOURCE]);
    chunks.retain(|c| c.similarity >= threshold);
    chunks.truncate(ctx.top_k);
    CascadeOutcome {
        chunks,
        matched,
        short_circuited: Some(rule.name),
        prefer_proof_channels: false,
    }
}

/// Stable partition: chunks from `sources` first, both sides keeping their
/// similarity order
fn promote_sources(chunks: Vec<RankedChunk>, sources: &[&str]) -> Vec<RankedChunk> {
    let (mut matching, rest): (Vec<RankedChunk>, Vec<RankedChunk>) = chunks
        .into_iter()
        .partition(|c| sources.contains(&c.document.source.as_str()));
    matching.extend(rest);
    matching
}

/// Whether a loose-normalized message is asking for social proof, in either
/// first-ask or repeat-ask phrasing. Used to scan conversation history.
pub fn is_proof_request(loose: &str) -> bool {
    PROOF_TRIGGERS
        .iter()
        .chain(MORE_PROOF_TRIGGERS)
        .any(|t| loose.contains(t))
}

/// Highest context floor among the matched rules
pub fn max_context_floor(matched: &[&str]) -> Option<usize> {
    RULES
        .iter()
        .filter(|r| matched.contains(&r.name))
        .filter_map(|r| r.context_floor)
        .max()
}

/// True when the stage permits price and payment talk
fn stage_allows_offer_talk(stage: Option<FunnelStage>) -> bool {
    stage.map_or(true, |s| s.is_offer_eligible())
}
