//! Reference catalogs (practices and quotes) and seeding.

use cuidar_core::{Dimension, MotivationalQuote, Practice};
use tracing::info;

use crate::query::{Collection, Filter};
use crate::record::Record;
use crate::trait_::{RecordStore, Result};

/// Static description of a catalog practice.
#[derive(Debug, Clone, Copy)]
pub struct SeedPractice {
    /// Title
    pub title: &'static str,
    /// Dimension
    pub dimension: Dimension,
    /// Minutes
    pub duration_minutes: u32,
    /// Description
    pub description: &'static str,
    /// Steps
    pub instructions: &'static [&'static str],
    /// Reflection question
    pub reflection_prompt: &'static str,
}

impl SeedPractice {
    /// Build a fresh practice record at catalog position `order_index`.
    pub fn to_practice(&self, order_index: i32) -> Practice {
        let mut practice = Practice::new(self.title, self.dimension, self.duration_minutes, self.description);
        practice.instructions = self.instructions.iter().map(|s| s.to_string()).collect();
        practice.reflection_prompt = Some(self.reflection_prompt.to_string());
        practice.order_index = Some(order_index);
        practice
    }
}

/// The ten practices shipped with the app, in catalog order.
pub const CATALOG: [SeedPractice; 10] = [
    SeedPractice {
        title: "Conexão Profunda",
        dimension: Dimension::Emocional,
        duration_minutes: 2,
        description: "Feche os olhos por 2 minutos e respire profundamente, reconectando-se consigo mesma.",
        instructions: &[
            "Feche os olhos",
            "Inspire profundamente por 30 segundos",
            "Expire lentamente por 30 segundos",
            "Sinta seu corpo relaxar completamente",
            "Observe as sensações presentes sem julgamento",
        ],
        reflection_prompt: "Como você se sente agora?",
    },
    SeedPractice {
        title: "Reconhecendo o Valor Pessoal",
        dimension: Dimension::Emocional,
        duration_minutes: 5,
        description: "Escreva 3 coisas que você gosta em si mesma hoje.",
        instructions: &[
            "Encontre um lugar tranquilo",
            "Escreva 3 coisas que você gosta em si mesma",
            "Podem ser qualidades, conquistas ou pequenos hábitos",
            "Reflita sobre o porquê de gostar dessas coisas",
            "Permita-se sentir orgulho dessas características",
        ],
        reflection_prompt: "Por que essas qualidades são importantes para você?",
    },
    SeedPractice {
        title: "Pequenas Ações, Grandes Impactos",
        dimension: Dimension::Social,
        duration_minutes: 5,
        description: "Liste 3 pequenas ações que você pode fazer hoje só por você.",
        instructions: &[
            "Pense em ações simples e rápidas",
            "Exemplos: beber água com limão, ouvir música favorita, ligar para um amigo",
            "Escreva suas 3 ações escolhidas",
            "Comprometa-se a realizá-las hoje",
            "Celebre cada uma ao completar",
        ],
        reflection_prompt: "Qual ação te trouxe mais alegria?",
    },
    SeedPractice {
        title: "Atenção Plena no Cotidiano",
        dimension: Dimension::Espiritual,
        duration_minutes: 10,
        description: "Pratique mindfulness durante uma atividade cotidiana.",
        instructions: &[
            "Escolha uma atividade diária (cozinhar, tomar banho, escovar dentes)",
            "Foque totalmente no momento presente",
            "Observe todos os detalhes: cores, texturas, aromas",
            "Preste atenção nas sensações físicas",
            "Observe os sons ao seu redor",
            "Sinta a diferença que a atenção plena faz",
        ],
        reflection_prompt: "O que você notou de diferente ao prestar atenção plena?",
    },
    SeedPractice {
        title: "Mapeando a Felicidade e a Paz",
        dimension: Dimension::Emocional,
        duration_minutes: 5,
        description: "Identifique momentos de felicidade e paz no seu dia.",
        instructions: &[
            "Pense no seu dia até agora",
            "Liste 3 momentos em que se sentiu feliz ou em paz",
            "Reflita sobre o que causou esses sentimentos",
            "Identifique padrões: pessoas, lugares, atividades",
            "Pense em como criar mais desses momentos",
        ],
        reflection_prompt: "Como você pode criar mais momentos assim na sua vida?",
    },
    SeedPractice {
        title: "Carta de Amor Próprio",
        dimension: Dimension::Emocional,
        duration_minutes: 10,
        description: "Escreva uma carta carinhosa para você mesma.",
        instructions: &[
            "Encontre um lugar confortável e privado",
            "Comece com 'Querida [seu nome]'",
            "Use palavras de carinho, incentivo e validação",
            "Relembre suas qualidades e conquistas recentes",
            "Reconheça os desafios que tem enfrentado",
            "Termine com uma mensagem de amor e apoio",
            "Guarde-a para reler quando precisar",
        ],
        reflection_prompt: "Como foi escrever essa carta? Que emoções surgiram?",
    },
    SeedPractice {
        title: "Alongamento e Conexão Corporal",
        dimension: Dimension::Fisico,
        duration_minutes: 5,
        description: "Alongue seu corpo com consciência e respiração.",
        instructions: &[
            "Respire profundamente 3 vezes",
            "Alongue o pescoço (direita, esquerda, frente, trás)",
            "Alongue os braços acima da cabeça",
            "Incline-se para tocar os pés (não force)",
            "Alongue as costas fazendo um gato/vaca",
            "Sinta cada músculo se soltando",
            "Respire profundamente ao final",
        ],
        reflection_prompt: "Onde seu corpo precisa de mais atenção?",
    },
    SeedPractice {
        title: "Encontrando o Prazer no Movimento",
        dimension: Dimension::Fisico,
        duration_minutes: 10,
        description: "Movimente-se de uma forma prazerosa, sem pressão.",
        instructions: &[
            "Escolha uma atividade física que você goste",
            "Pode ser dança, caminhada, yoga, natação, ou qualquer outra",
            "Faça por 10 minutos no seu ritmo",
            "Sem pressão de performance ou intensidade",
            "Foque no prazer de se movimentar",
            "Observe como seu corpo responde",
            "Celebre o movimento ao final",
        ],
        reflection_prompt: "Como seu corpo se sente após o movimento?",
    },
    SeedPractice {
        title: "O Santuário Pessoal",
        dimension: Dimension::Espiritual,
        duration_minutes: 15,
        description: "Crie ou reorganize seu espaço sagrado.",
        instructions: &[
            "Escolha um cantinho da casa (pode ser pequeno)",
            "Observe o que está lá atualmente",
            "Remova o que não serve mais ou não traz alegria",
            "Limpe e organize o espaço",
            "Adicione algo que traga alegria: planta, foto, objeto especial",
            "Adicione elementos sensoriais: vela aromática, almofada confortável",
            "Sente-se neste espaço por alguns minutos",
            "Sinta a energia transformada",
        ],
        reflection_prompt: "Como você se sente neste espaço agora?",
    },
    SeedPractice {
        title: "Conexão Sensorial",
        dimension: Dimension::Intelectual,
        duration_minutes: 10,
        description: "Dedique-se a uma atividade criativa ou intelectual.",
        instructions: &[
            "Escolha uma atividade criativa ou intelectual",
            "Pode ser desenhar, escrever, colorir, ouvir música, ler",
            "Desligue todas as distrações (celular, TV)",
            "Dedique-se totalmente por 10 minutos",
            "Observe como sua mente reage",
            "Permita-se fluir sem autocrítica",
            "Celebre sua criatividade ao final",
        ],
        reflection_prompt: "O que você criou ou aprendeu? Como se sentiu?",
    },
];

/// The twelve motivational quotes shipped with the app.
pub const QUOTES: [&str; 12] = [
    "O cuidado que você dá a si mesma hoje será a energia que você terá amanhã para os outros.",
    "Pequenos atos de amor próprio geram grandes mudanças no seu dia.",
    "O autocuidado é uma forma de resistência. É dizer: 'eu também importo'.",
    "Descansar não é um prêmio por um dia cheio. É uma necessidade humana.",
    "Transforme tarefas comuns em momentos de cuidado.",
    "Cinco minutos dedicados a você podem mudar toda a sua energia.",
    "Você não precisa se sacrificar para ser uma boa mãe. Cuidar de você também é cuidar deles.",
    "Permitir-se descansar é um ato de coragem e amor próprio.",
    "O cuidado de hoje é a força de amanhã.",
    "Cada pequeno gesto importa. Sua jornada de autocuidado é única e valiosa.",
    "Você merece atenção, cuidado e amor todos os dias. Permita-se.",
    "O autocuidado não é egoísmo, é a base para uma vida plena e feliz.",
];

/// Insert the catalog when the practices collection is empty.
///
/// Returns the number of practices inserted (0 when already seeded).
pub async fn seed_practices(store: &dyn RecordStore) -> Result<usize> {
    let existing = store.count(Collection::Practices, &Filter::new()).await?;
    if existing > 0 {
        info!(existing, "practices already present, skipping seed");
        return Ok(0);
    }

    for (index, seed) in CATALOG.iter().enumerate() {
        store.insert(Record::from(seed.to_practice(index as i32 + 1))).await?;
    }

    info!(inserted = CATALOG.len(), "seeded practice catalog");
    Ok(CATALOG.len())
}

/// Insert [`QUOTES`] when the quotes collection is empty.
///
/// Returns the number of quotes inserted (0 when already seeded).
pub async fn seed_quotes(store: &dyn RecordStore) -> Result<usize> {
    let existing = store.count(Collection::MotivationalQuotes, &Filter::new()).await?;
    if existing > 0 {
        info!(existing, "quotes already present, skipping seed");
        return Ok(0);
    }

    for text in QUOTES {
        store.insert(Record::from(MotivationalQuote::new(text))).await?;
    }

    info!(inserted = QUOTES.len(), "seeded quote catalog");
    Ok(QUOTES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;
    use crate::query::{OrderBy, Value};
    use crate::record::typed;
    use crate::trait_::DataSource;

    #[test]
    fn test_catalog_covers_every_dimension() {
        for dimension in Dimension::ALL {
            assert!(CATALOG.iter().any(|p| p.dimension == dimension), "{dimension} missing");
        }
        assert!(CATALOG.iter().all(|p| (2..=15).contains(&p.duration_minutes)));
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = MemoryStorage::new();
        assert_eq!(seed_practices(&store).await.unwrap(), 10);
        assert_eq!(seed_practices(&store).await.unwrap(), 0);
        assert_eq!(store.count(Collection::Practices, &Filter::new()).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_seeded_practices_keep_catalog_order() {
        let store = MemoryStorage::new();
        seed_practices(&store).await.unwrap();

        let rows = store
            .list(
                Collection::Practices,
                &Filter::new().eq("dimension", Value::text(Dimension::Fisico)),
                Some(&OrderBy::asc("order_index")),
                None,
            )
            .await
            .unwrap();
        let practices: Vec<Practice> = typed(rows).unwrap();
        let titles: Vec<_> = practices.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Alongamento e Conexão Corporal", "Encontrando o Prazer no Movimento"]);
        assert_eq!(practices[0].order_index, Some(7));
    }

    #[tokio::test]
    async fn test_quotes_seed_once_in_order() {
        let store = MemoryStorage::new();
        assert_eq!(seed_quotes(&store).await.unwrap(), 12);
        assert_eq!(seed_quotes(&store).await.unwrap(), 0);

        let quotes: Vec<MotivationalQuote> = typed(
            store
                .list(Collection::MotivationalQuotes, &Filter::new(), None, None)
                .await
                .unwrap(),
        )
        .unwrap();
        assert_eq!(quotes.len(), 12);
        assert_eq!(quotes[8].text, "O cuidado de hoje é a força de amanhã.");
        assert!(quotes.iter().all(|q| q.author.is_none()));
    }

    #[tokio::test]
    async fn test_quote_seed_ignores_practices() {
        let store = MemoryStorage::new();
        seed_practices(&store).await.unwrap();
        assert_eq!(seed_quotes(&store).await.unwrap(), 12);
    }
}
